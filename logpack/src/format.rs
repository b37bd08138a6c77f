//! Walks a printf-style format string and encodes its arguments.
//!
//! The walker alternates between two states: copying literal text through to
//! the rewritten format, and parsing a single `%` specifier. Each specifier
//! pulls its arguments from the caller's list in order, encodes them, and
//! writes a normalized form of itself to the rewritten format.
//!
//! Supported conversions:
//! * `d i` signed integers, `o u x X` unsigned integers
//! * `a A e E f F g G` floating-point, always encoded as precision + value
//! * `c C` characters, `s S` strings, `@` any value as an object
//! * `p` pointers, `P` raw bytes (requires a precision giving the length)
//! * `m` the captured `errno`, which consumes no argument
//!
//! A `{...}` block inside a specifier is a privacy annotation. It is removed
//! from the rewritten format and marks the argument `private` or `public`.

use crate::encoder::{clip, Width};
use crate::{Encoder, Error, Message, Privacy, Value};
use core::cmp::min;
use core::ops::Range;
use log::{debug, trace};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum Length {
    #[default]
    Default,
    Char,
    Short,
    Long,
    LongLong,
    LongDouble,
    Quad,
    Size,
    Max,
    PtrDiff,
}

impl Length {
    fn width(self) -> Width {
        match self {
            Length::Default | Length::Char | Length::Short | Length::LongDouble => Width::Int,
            _ => Width::Long,
        }
    }

    // `L` is dropped since long doubles are encoded as doubles
    fn as_str(self) -> &'static str {
        match self {
            Length::Default | Length::LongDouble => "",
            Length::Char => "hh",
            Length::Short => "h",
            Length::Long => "l",
            Length::LongLong => "ll",
            Length::Quad => "q",
            Length::Size => "z",
            Length::Max => "j",
            Length::PtrDiff => "t",
        }
    }
}

/// A specifier as parsed so far.
#[derive(Default)]
struct Specifier {
    /// flag characters and literal width digits, copied verbatim
    flags: String,
    /// field width supplied by a `*` argument
    width: Option<i32>,
    /// precision from literal digits or a `*` argument
    precision: Option<i32>,
    length: Length,
    privacy: Privacy,
}

struct Walker<'a, 'b> {
    format: &'a str,
    args: &'a [Value<'a>],
    next: usize,
    errno: i32,
    encoder: Encoder<'b>,
    output: String,
    placeholders: Vec<Range<usize>>,
}

/// Encode `args` according to `format`, consuming the encoder.
pub(crate) fn walk(
    encoder: Encoder<'_>,
    format: &str,
    args: &[Value<'_>],
    errno: i32,
) -> Result<Message, Error> {
    let mut walker = Walker {
        format,
        args,
        next: 0,
        errno,
        encoder,
        output: String::with_capacity(format.len()),
        placeholders: Vec::new(),
    };

    if let Err(e) = walker.run() {
        debug!("dropping log statement {format:?}: {e}");
        return Err(e);
    }

    let packed = walker.encoder.finish();
    if packed.is_truncated() {
        trace!(
            "log statement {format:?} truncated to {} commands",
            packed.header().count()
        );
    }

    Ok(Message {
        format: walker.output,
        placeholders: walker.placeholders,
        packed,
    })
}

impl<'a, 'b> Walker<'a, 'b> {
    fn run(&mut self) -> Result<(), Error> {
        let bytes = self.format.as_bytes();
        let mut literal = 0;
        let mut offset = 0;

        while offset < bytes.len() {
            if bytes[offset] != b'%' {
                offset += 1;
                continue;
            }

            self.output.push_str(&self.format[literal..offset]);

            if bytes.get(offset + 1) == Some(&b'%') {
                self.output.push('%');
                offset += 2;
            } else {
                offset = self.specifier(offset)?;
            }

            literal = offset;
        }

        self.output.push_str(&self.format[literal..]);
        Ok(())
    }

    fn next_arg(&mut self) -> Result<&'a Value<'a>, Error> {
        let args = self.args;
        let value = args
            .get(self.next)
            .ok_or(Error::MissingArgument { index: self.next })?;
        self.next += 1;
        Ok(value)
    }

    /// Consume an argument which supplies a width or precision.
    fn next_count(&mut self) -> Result<i32, Error> {
        let value = self.next_arg()?;
        Ok(match value.as_integer() {
            Some(v) => v.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            None => {
                debug!("non-integer width or precision argument: {value:?}");
                -1
            }
        })
    }

    /// Parse the specifier starting at `start`, which points at a `%`, and
    /// return the offset just past its conversion character.
    fn specifier(&mut self, start: usize) -> Result<usize, Error> {
        let bytes = self.format.as_bytes();
        let mut spec = Specifier::default();
        let mut offset = start + 1;

        loop {
            let byte = *bytes
                .get(offset)
                .ok_or(Error::UnterminatedSpecifier { offset: start })?;

            match byte {
                b'-' | b'+' | b' ' | b'#' | b'\'' | b'0'..=b'9' => {
                    spec.flags.push(byte as char);
                    offset += 1;
                }
                b'*' => {
                    spec.width = Some(self.next_count()?);
                    offset += 1;
                }
                b'.' => {
                    offset += 1;
                    if bytes.get(offset) == Some(&b'*') {
                        spec.precision = Some(self.next_count()?);
                        offset += 1;
                    } else {
                        let digits = offset;
                        while bytes.get(offset).is_some_and(u8::is_ascii_digit) {
                            offset += 1;
                        }
                        // a bare `.` means a precision of zero
                        let precision = match &self.format[digits..offset] {
                            "" => 0,
                            text => text.parse().unwrap_or(i32::MAX),
                        };
                        spec.precision = Some(precision);
                    }
                }
                b'{' => {
                    let close = self.format[offset..]
                        .find('}')
                        .ok_or(Error::UnterminatedAnnotation { offset })?;
                    let annotation = &self.format[offset + 1..offset + close];
                    if annotation.contains("private") {
                        spec.privacy = Privacy::Private;
                    } else if annotation.contains("public") {
                        spec.privacy = Privacy::Public;
                    }
                    offset += close + 1;
                }
                b'h' => {
                    spec.length = match spec.length {
                        Length::Short => Length::Char,
                        _ => Length::Short,
                    };
                    offset += 1;
                }
                b'l' => {
                    spec.length = match spec.length {
                        Length::Long => Length::LongLong,
                        _ => Length::Long,
                    };
                    offset += 1;
                }
                b'L' | b'q' | b'z' | b'j' | b't' => {
                    spec.length = match byte {
                        b'L' => Length::LongDouble,
                        b'q' => Length::Quad,
                        b'z' => Length::Size,
                        b'j' => Length::Max,
                        _ => Length::PtrDiff,
                    };
                    offset += 1;
                }
                _ => {
                    // `offset` always sits on a char boundary here
                    let conversion = self.format[offset..]
                        .chars()
                        .next()
                        .ok_or(Error::UnterminatedSpecifier { offset: start })?;
                    self.convert(&spec, conversion, offset)?;
                    return Ok(offset + conversion.len_utf8());
                }
            }
        }
    }

    fn convert(&mut self, spec: &Specifier, conversion: char, offset: usize) -> Result<(), Error> {
        match conversion {
            'd' | 'i' | 'o' | 'u' | 'x' | 'X' => {
                let value = self.next_arg()?;
                self.integer(spec, conversion, value);
            }
            'a' | 'A' | 'e' | 'E' | 'f' | 'F' | 'g' | 'G' => {
                let value = self.next_arg()?;
                self.float(spec, conversion, value);
            }
            'c' | 'C' => {
                let value = self.next_arg()?;
                self.character(spec, conversion, value);
            }
            's' | 'S' => {
                let value = self.next_arg()?;
                self.string(spec, conversion, value);
            }
            '@' => {
                let value = self.next_arg()?;
                self.object(spec, value);
            }
            'p' => {
                let value = self.next_arg()?;
                self.pointer(spec, value);
            }
            'P' => {
                let value = self.next_arg()?;
                self.data(spec, value);
            }
            'm' => {
                self.emit_width(spec);
                self.encoder.add_errno(self.errno, spec.privacy.flags());
                self.placeholder(spec, false, "m");
            }
            _ => return Err(Error::UnknownConversion { conversion, offset }),
        }

        Ok(())
    }

    // counts are staged so they are written together with their value
    fn emit_width(&mut self, spec: &Specifier) {
        if let Some(width) = spec.width {
            self.encoder.stage_count(width);
        }
    }

    fn emit_counts(&mut self, spec: &Specifier) {
        self.emit_width(spec);
        if let Some(precision) = spec.precision {
            self.encoder.stage_count(precision);
        }
    }

    /// Write the rewritten specifier to the output and record its range.
    fn placeholder(&mut self, spec: &Specifier, precision: bool, conversion: &str) {
        let start = self.output.len();
        self.output.push('%');
        self.output.push_str(&spec.flags);
        if spec.width.is_some() {
            self.output.push('*');
        }
        if precision {
            self.output.push_str(".*");
        }
        self.output.push_str(spec.length.as_str());
        self.output.push_str(conversion);
        self.placeholders.push(start..self.output.len());
    }

    /// Encode an argument that does not match its specifier as text under a
    /// plain `%@`, so the message is still delivered.
    fn fallback(&mut self, spec: &Specifier, conversion: char, value: &Value<'_>) {
        trace!("argument {value:?} does not match %{conversion}, encoding as an object");
        let text = value.to_string();
        self.encoder.add_object_text(&text, spec.privacy.flags());

        let start = self.output.len();
        self.output.push_str("%@");
        self.placeholders.push(start..self.output.len());
    }

    fn integer(&mut self, spec: &Specifier, conversion: char, value: &Value<'_>) {
        let bits = match value {
            Value::Signed(v) => *v as u64,
            Value::Unsigned(v) => *v,
            _ => return self.fallback(spec, conversion, value),
        };

        self.emit_counts(spec);
        self.encoder
            .add_uint(bits, spec.length.width(), spec.privacy.flags());
        self.placeholder(spec, spec.precision.is_some(), conversion.encode_utf8(&mut [0; 4]));
    }

    fn float(&mut self, spec: &Specifier, conversion: char, value: &Value<'_>) {
        let (value, default_precision) = match value {
            Value::Float(v, precision) => (*v, *precision),
            Value::Signed(v) => (*v as f64, None),
            Value::Unsigned(v) => (*v as f64, None),
            _ => return self.fallback(spec, conversion, value),
        };

        let precision = spec.precision.or(default_precision).unwrap_or(-1);

        self.emit_width(spec);
        self.encoder
            .add_float(value, precision, spec.privacy.flags());
        self.placeholder(spec, true, conversion.encode_utf8(&mut [0; 4]));
    }

    fn character(&mut self, spec: &Specifier, conversion: char, value: &Value<'_>) {
        let code = match value {
            Value::Signed(v) => *v as u64,
            Value::Unsigned(v) => *v,
            Value::Text(text) if text.chars().count() == 1 => {
                text.chars().next().map(|c| c as u64).unwrap_or_default()
            }
            _ => return self.fallback(spec, conversion, value),
        };

        self.emit_counts(spec);
        self.encoder.add_uint(code, Width::Int, spec.privacy.flags());
        self.placeholder(spec, spec.precision.is_some(), conversion.encode_utf8(&mut [0; 4]));
    }

    fn string(&mut self, spec: &Specifier, conversion: char, value: &Value<'_>) {
        let text = match value {
            Value::Text(text) => text.clone(),
            Value::Bytes(bytes) => String::from_utf8_lossy(bytes),
            _ => return self.fallback(spec, conversion, value),
        };

        let wide = conversion == 'S' || spec.length == Length::Long;
        let flags = spec.privacy.flags();

        self.emit_counts(spec);
        match (wide, spec.precision) {
            (true, Some(p)) if p >= 0 => {
                let end = text
                    .char_indices()
                    .nth(p as usize)
                    .map(|(i, _)| i)
                    .unwrap_or(text.len());
                self.encoder.add_wide_string(&text[..end], flags)
            }
            (true, _) => self.encoder.add_wide_string(&text, flags),
            (false, Some(p)) if p >= 0 => self.encoder.add_string(clip(&text, p as usize), flags),
            (false, _) => self.encoder.add_string(&text, flags),
        };
        self.placeholder(spec, spec.precision.is_some(), conversion.encode_utf8(&mut [0; 4]));
    }

    fn object(&mut self, spec: &Specifier, value: &Value<'_>) {
        let flags = spec.privacy.flags();

        self.emit_counts(spec);
        match value {
            Value::Object(object) => self.encoder.add_object(*object, flags),
            Value::Text(text) => self.encoder.add_object_text(text, flags),
            other => self.encoder.add_object_text(&other.to_string(), flags),
        };
        self.placeholder(spec, spec.precision.is_some(), "@");
    }

    fn pointer(&mut self, spec: &Specifier, value: &Value<'_>) {
        let address = match value {
            Value::Object(object) => object.handle(),
            Value::Signed(v) => *v as u64,
            Value::Unsigned(v) => *v,
            _ => return self.fallback(spec, 'p', value),
        };

        self.emit_counts(spec);
        self.encoder.add_pointer(address, spec.privacy.flags());
        self.placeholder(spec, spec.precision.is_some(), "p");
    }

    /// `%P` dumps raw bytes and needs a positive precision giving the length.
    /// Without one the specifier is dropped, though its argument is still
    /// consumed.
    fn data(&mut self, spec: &Specifier, value: &Value<'_>) {
        let bytes: &[u8] = match value {
            Value::Bytes(bytes) => bytes,
            Value::Text(text) => text.as_bytes(),
            _ => return self.fallback(spec, 'P', value),
        };

        let len = match spec.precision {
            Some(p) if p > 0 => min(min(p as usize, bytes.len()), u8::MAX as usize),
            _ => {
                trace!("dropping %P without a length");
                return;
            }
        };

        self.emit_width(spec);
        self.encoder.stage_count(len as i32);
        self.encoder.add_data(&bytes[..len], spec.privacy.flags());
        self.placeholder(spec, true, "P");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode, CommandFlags, CommandType, Config, ObjectRef};

    fn encode(format: &str, args: &[Value<'_>]) -> Result<Message, Error> {
        Config::default().encode(format, args, 0)
    }

    fn kinds(message: &Message) -> Vec<CommandType> {
        decode(message.buffer())
            .unwrap()
            .commands()
            .iter()
            .map(|c| c.kind())
            .collect()
    }

    #[test]
    fn literal_only() {
        let message = encode("100%% done, 50%% left", &[]).unwrap();
        assert_eq!(message.format(), "100% done, 50% left");
        assert_eq!(message.header().count(), 0);
        assert!(message.placeholders().is_empty());
    }

    #[test]
    fn non_ascii_literals() {
        let message = encode("température: %d°C ✓", &[21.into()]).unwrap();
        assert_eq!(message.format(), "température: %d°C ✓");
        assert_eq!(&message.format()[message.placeholders()[0].clone()], "%d");
    }

    #[test]
    fn integer_widths() {
        let message = encode("%d %ld %lld %hhd %zu %jx %tu %qd", &[
            1.into(),
            2.into(),
            3.into(),
            4.into(),
            5usize.into(),
            6u64.into(),
            7.into(),
            8.into(),
        ])
        .unwrap();

        assert_eq!(message.format(), "%d %ld %lld %hhd %zu %jx %tu %qd");
        let decoded = message.decode().unwrap();
        let sizes: Vec<usize> = decoded
            .commands()
            .iter()
            .map(|c| c.payload().len())
            .collect();
        assert_eq!(sizes, vec![4, 8, 8, 4, 8, 8, 8, 8]);
    }

    #[test]
    fn negative_int_is_truncated_to_width() {
        let message = encode("%d", &[(-5i64).into()]).unwrap();
        let decoded = message.decode().unwrap();
        assert_eq!(decoded.commands()[0].payload(), &(-5i32).to_le_bytes());
    }

    #[test]
    fn flags_and_width_copied() {
        let message = encode("[%-08x] [%+ d] [%#o] [%'d]", &[
            1u32.into(),
            2.into(),
            3u32.into(),
            4.into(),
        ])
        .unwrap();
        assert_eq!(message.format(), "[%-08x] [%+ d] [%#o] [%'d]");
        assert_eq!(message.header().count(), 4);
    }

    #[test]
    fn star_width_and_precision() {
        let message = encode("%*.*d|", &[10.into(), 3.into(), 42.into()]).unwrap();
        assert_eq!(message.format(), "%*.*d|");
        assert_eq!(
            kinds(&message),
            vec![CommandType::Count, CommandType::Count, CommandType::Scalar]
        );
        let decoded = message.decode().unwrap();
        assert_eq!(decoded.commands()[0].as_i64(), Some(10));
        assert_eq!(decoded.commands()[1].as_i64(), Some(3));
        assert_eq!(decoded.commands()[2].as_i64(), Some(42));
    }

    #[test]
    fn literal_precision_becomes_count() {
        let message = encode("%.3d %8.2f", &[7.into(), 1.5.into()]).unwrap();
        assert_eq!(message.format(), "%.*d %8.*f");
        let decoded = message.decode().unwrap();
        assert_eq!(decoded.commands()[0].as_i64(), Some(3));
        assert_eq!(decoded.commands()[2].as_i64(), Some(2));
        assert_eq!(decoded.commands()[3].as_f64(), Some(1.5));
    }

    #[test]
    fn bare_dot_precision_is_zero() {
        let message = encode("%.f", &[2.0.into()]).unwrap();
        assert_eq!(message.decode().unwrap().commands()[0].as_i64(), Some(0));
    }

    #[test]
    fn float_precision_sources() {
        // from the argument when the format has none
        let message = encode("%f", &[Value::Float(1.0, Some(4))]).unwrap();
        assert_eq!(message.format(), "%.*f");
        assert_eq!(message.decode().unwrap().commands()[0].as_i64(), Some(4));

        // the format wins over the argument
        let message = encode("%.1f", &[Value::Float(1.0, Some(4))]).unwrap();
        assert_eq!(message.decode().unwrap().commands()[0].as_i64(), Some(1));

        // otherwise unspecified
        let message = encode("%g", &[1.0.into()]).unwrap();
        assert_eq!(message.decode().unwrap().commands()[0].as_i64(), Some(-1));
    }

    #[test]
    fn long_double_is_a_double() {
        let message = encode("%Lf", &[0.25.into()]).unwrap();
        assert_eq!(message.format(), "%.*f");
        assert_eq!(message.decode().unwrap().commands()[1].as_f64(), Some(0.25));
    }

    #[test]
    fn integers_accepted_as_floats() {
        let message = encode("%e", &[3.into()]).unwrap();
        assert_eq!(message.decode().unwrap().commands()[1].as_f64(), Some(3.0));
    }

    #[test]
    fn privacy_annotations() {
        let message = encode("%{public}s %{private, mask.hash}d %{bool}d", &[
            "a".into(),
            1.into(),
            0.into(),
        ])
        .unwrap();
        assert_eq!(message.format(), "%s %d %d");

        let decoded = message.decode().unwrap();
        assert_eq!(decoded.commands()[0].flags(), CommandFlags::PUBLIC);
        assert_eq!(decoded.commands()[1].flags(), CommandFlags::PRIVATE);
        assert_eq!(decoded.commands()[2].flags(), CommandFlags::empty());
        assert!(decoded.header().has_private());
    }

    #[test]
    fn characters() {
        let message = encode("%c%C%lc", &['x'.into(), "é".into(), 0x263A.into()]).unwrap();
        assert_eq!(message.format(), "%c%C%lc");
        let decoded = message.decode().unwrap();
        assert_eq!(decoded.commands()[0].as_u64(), Some('x' as u64));
        assert_eq!(decoded.commands()[1].as_u64(), Some('é' as u64));
        assert_eq!(decoded.commands()[2].as_u64(), Some(0x263A));
    }

    #[test]
    fn strings() {
        let message = encode("%s %.3s %S %ls", &[
            "hello".into(),
            "truncate".into(),
            "wide".into(),
            "wí".into(),
        ])
        .unwrap();
        assert_eq!(message.format(), "%s %.*s %S %ls");
        assert!(message.header().has_non_scalar());

        let decoded = message.decode().unwrap();
        assert_eq!(decoded.commands()[0].kind(), CommandType::String);
        assert_eq!(decoded.commands()[0].as_str(), Some("hello"));
        assert_eq!(decoded.commands()[1].kind(), CommandType::Count);
        assert_eq!(decoded.commands()[2].as_str(), Some("tru"));
        assert_eq!(decoded.commands()[3].kind(), CommandType::WideString);
        assert_eq!(decoded.commands()[3].as_wide_string().as_deref(), Some("wide"));
        assert_eq!(decoded.commands()[4].as_wide_string().as_deref(), Some("wí"));
    }

    #[test]
    fn objects() {
        let handle = ObjectRef::new(0xfeed);
        let message = encode("%@ %@ %@", &[handle.into(), "text".into(), 12.into()]).unwrap();
        assert_eq!(message.format(), "%@ %@ %@");

        let decoded = message.decode().unwrap();
        assert!(decoded.commands().iter().all(|c| c.kind() == CommandType::Object));
        assert_eq!(decoded.commands()[0].as_u64(), Some(0xfeed));
        assert_eq!(decoded.commands()[1].as_str(), Some("text"));
        assert_eq!(decoded.commands()[2].as_str(), Some("12"));
    }

    #[test]
    fn pointers() {
        let message = encode("%p", &[ObjectRef::new(0x1000).into()]).unwrap();
        let decoded = message.decode().unwrap();
        assert_eq!(decoded.commands()[0].kind(), CommandType::Scalar);
        assert_eq!(decoded.commands()[0].as_u64(), Some(0x1000));
    }

    #[test]
    fn data_with_length() {
        let bytes = vec![1u8, 2, 3, 4, 5];
        let message = encode("%.*P|%.2P", &[3.into(), bytes.clone().into(), bytes.into()]).unwrap();
        assert_eq!(message.format(), "%.*P|%.*P");

        let decoded = message.decode().unwrap();
        assert_eq!(
            kinds(&message),
            vec![
                CommandType::Count,
                CommandType::Data,
                CommandType::Count,
                CommandType::Data
            ]
        );
        assert_eq!(decoded.commands()[1].payload(), &[1, 2, 3]);
        assert_eq!(decoded.commands()[3].payload(), &[1, 2]);
    }

    #[test]
    fn data_length_is_clamped() {
        let bytes = vec![9u8; 300];
        let message = encode("%.*P", &[1000.into(), bytes.into()]).unwrap();
        let decoded = message.decode().unwrap();
        assert_eq!(decoded.commands()[0].as_i64(), Some(255));
        assert_eq!(decoded.commands()[1].payload().len(), 255);
    }

    #[test]
    fn data_without_length_is_dropped() {
        let message = encode("a%Pb%dc", &[vec![1u8].into(), 5.into()]).unwrap();
        assert_eq!(message.format(), "ab%dc");
        assert_eq!(kinds(&message), vec![CommandType::Scalar]);
        assert_eq!(message.decode().unwrap().commands()[0].as_i64(), Some(5));

        let message = encode("%.*P", &[0.into(), vec![1u8].into()]).unwrap();
        assert_eq!(message.format(), "");
        assert_eq!(message.header().count(), 0);
    }

    #[test]
    fn errno() {
        let message = Config::default()
            .encode("open failed: %m (%d)", &[3.into()], 2)
            .unwrap();
        assert_eq!(message.format(), "open failed: %m (%d)");
        let decoded = message.decode().unwrap();
        assert_eq!(decoded.commands()[0].kind(), CommandType::Errno);
        assert_eq!(decoded.commands()[0].as_i64(), Some(2));
        assert_eq!(decoded.commands()[1].as_i64(), Some(3));
    }

    #[test]
    fn mismatch_falls_back_to_object() {
        let message = encode("%d items in %x", &["many".into(), 1.5.into()]).unwrap();
        assert_eq!(message.format(), "%@ items in %@");

        let decoded = message.decode().unwrap();
        assert_eq!(kinds(&message), vec![CommandType::Object, CommandType::Object]);
        assert_eq!(decoded.commands()[0].as_str(), Some("many"));
        assert_eq!(decoded.commands()[1].as_str(), Some("1.5"));
    }

    #[test]
    fn failures() {
        assert_eq!(
            encode("%y", &[1.into()]),
            Err(Error::UnknownConversion {
                conversion: 'y',
                offset: 1
            })
        );
        assert_eq!(
            encode("%n", &[1.into()]),
            Err(Error::UnknownConversion {
                conversion: 'n',
                offset: 1
            })
        );
        assert_eq!(
            encode("%é", &[1.into()]),
            Err(Error::UnknownConversion {
                conversion: 'é',
                offset: 1
            })
        );
        assert_eq!(
            encode("trailing %", &[]),
            Err(Error::UnterminatedSpecifier { offset: 9 })
        );
        assert_eq!(
            encode("%08l", &[1.into()]),
            Err(Error::UnterminatedSpecifier { offset: 0 })
        );
        assert_eq!(
            encode("%{private d", &[1.into()]),
            Err(Error::UnterminatedAnnotation { offset: 1 })
        );
        assert_eq!(
            encode("%d %d", &[1.into()]),
            Err(Error::MissingArgument { index: 1 })
        );
        assert_eq!(
            encode("%.*f", &[2.into()]),
            Err(Error::MissingArgument { index: 1 })
        );
    }

    #[test]
    fn excess_arguments_are_ignored() {
        let message = encode("%d", &[1.into(), 2.into()]).unwrap();
        assert_eq!(message.header().count(), 1);
    }

    #[test]
    fn placeholders() {
        let message = encode("a %{public}d b %.*f c %%", &[1.into(), 2.into(), 3.0.into()]).unwrap();
        assert_eq!(message.format(), "a %d b %.*f c %");
        let spans: Vec<&str> = message
            .placeholders()
            .iter()
            .map(|r| &message.format()[r.clone()])
            .collect();
        assert_eq!(spans, vec!["%d", "%.*f"]);
    }

    #[test]
    fn counts_never_outlive_their_value() {
        let config = Config::builder()
            .initial_capacity(8)
            .max_capacity(10)
            .build()
            .unwrap();

        for (format, args) in [
            ("%.*d", vec![Value::from(3), 7.into()]),
            ("%*f", vec![Value::from(5), 1.5.into()]),
            ("%.2s", vec![Value::from("text")]),
            ("%.*P", vec![Value::from(2), vec![1u8, 2].into()]),
            ("%*m", vec![Value::from(4)]),
        ] {
            let message = config.encode(format, &args, 2).unwrap();
            assert!(message.is_truncated(), "{format}");
            assert!(kinds(&message).is_empty(), "{format}");
        }
    }

    #[test]
    fn huge_argument_precision_is_not_fatal() {
        let float = Value::Float(1.0, Some(70_000));

        let message = encode("%d", &[float.clone()]).unwrap();
        assert_eq!(kinds(&message), vec![CommandType::Object]);
        assert!(message.decode().unwrap().commands()[0].as_str().unwrap().starts_with("1.000"));

        assert!(encode("%@", &[float.clone()]).is_ok());
        assert!(encode("%f", &[float]).is_ok());
    }
}
