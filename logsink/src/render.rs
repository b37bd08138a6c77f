// Copyright 2023 IOP Systems, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Renders a packed message back into text.
//!
//! Rendering walks the placeholders recorded in the message alongside its
//! decoded commands. A placeholder which carries `*` for its width or
//! precision takes the corresponding `count` commands first, then its value.
//! Formatting follows printf closely for the conversions the encoder
//! produces, but is not a byte-for-byte reimplementation of it.

use core::cmp::min;
use core::fmt::Write;
use logpack::{Command, CommandType, Message, ObjectRef, Privacy};

/// Shown in place of a private argument when redacting.
pub const PRIVATE: &str = "<private>";

/// Shown for placeholders whose commands were dropped by truncation.
pub const MISSING: &str = "<decode: missing data>";

/// Shown when a command does not have the type its placeholder expects.
pub const MISMATCH: &str = "<decode: mismatch>";

/// Widths and precisions are capped here. This is also the largest precision
/// the standard formatter accepts.
pub const FIELD_LIMIT: usize = u16::MAX as usize;

/// Render `message` as text. When `redact` is set, arguments whose effective
/// privacy is private are replaced with `<private>`.
pub fn render(message: &Message, redact: bool) -> String {
    let format = message.format();

    let decoded = match message.decode() {
        Ok(decoded) => decoded,
        Err(e) => return format!("{format} <decode: {e}>"),
    };

    let mut commands = decoded.commands().iter().copied();
    let mut output = String::with_capacity(format.len() * 2);
    let mut literal = 0;

    for range in message.placeholders() {
        output.push_str(&format[literal..range.start]);
        literal = range.end;

        let placeholder = Placeholder::parse(&format[range.clone()]);

        let mut width = placeholder.width;
        let mut left = placeholder.left;
        if placeholder.width_star {
            if let Some(w) = commands.next().and_then(count) {
                left |= w < 0;
                width = Some(min(w.unsigned_abs() as usize, FIELD_LIMIT));
            }
        }

        let precision = if placeholder.precision_star {
            commands
                .next()
                .and_then(count)
                .and_then(|p| usize::try_from(p).ok())
                .map(|p| min(p, FIELD_LIMIT))
        } else {
            None
        };

        let text = match commands.next() {
            None => MISSING.to_string(),
            Some(command) if redact && command.privacy() == Privacy::Private => {
                PRIVATE.to_string()
            }
            Some(command) => placeholder
                .value(&command, precision)
                .unwrap_or_else(|| MISMATCH.to_string()),
        };

        placeholder.pad(&mut output, &text, width, left);
    }

    output.push_str(&format[literal..]);
    output
}

fn count(command: Command<'_>) -> Option<i64> {
    if command.kind() == CommandType::Count {
        command.as_i64()
    } else {
        None
    }
}

/// A rewritten specifier, parsed back into the parts rendering needs.
#[derive(Default)]
struct Placeholder {
    left: bool,
    plus: bool,
    space: bool,
    alternate: bool,
    zero: bool,
    width: Option<usize>,
    width_star: bool,
    precision_star: bool,
    conversion: char,
}

impl Placeholder {
    fn parse(text: &str) -> Self {
        let body = text.strip_prefix('%').unwrap_or(text);
        let mut placeholder = Placeholder {
            conversion: body.chars().last().unwrap_or('@'),
            precision_star: body.contains(".*"),
            ..Default::default()
        };

        let mut chars = body.chars().peekable();
        while let Some(&c) = chars.peek() {
            match c {
                '-' => placeholder.left = true,
                '+' => placeholder.plus = true,
                ' ' => placeholder.space = true,
                '#' => placeholder.alternate = true,
                '0' => placeholder.zero = true,
                '\'' => {}
                _ => break,
            }
            chars.next();
        }

        let mut width = None;
        while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
            width = Some(
                width
                    .unwrap_or(0usize)
                    .saturating_mul(10)
                    .saturating_add(digit as usize),
            );
            chars.next();
        }
        placeholder.width = width;
        placeholder.width_star = chars.peek() == Some(&'*');

        placeholder
    }

    fn numeric(&self) -> bool {
        matches!(
            self.conversion,
            'd' | 'i' | 'o' | 'u' | 'x' | 'X' | 'a' | 'A' | 'e' | 'E' | 'f' | 'F' | 'g' | 'G'
        )
    }

    fn value(&self, command: &Command<'_>, precision: Option<usize>) -> Option<String> {
        let kind = command.kind();
        match self.conversion {
            'd' | 'i' if kind == CommandType::Scalar => {
                command.as_i64().map(|v| self.sign(v.to_string()))
            }
            'o' | 'u' | 'x' | 'X' if kind == CommandType::Scalar => {
                command.as_u64().map(|v| self.unsigned(v))
            }
            'a' | 'A' | 'e' | 'E' | 'f' | 'F' | 'g' | 'G' if kind == CommandType::Scalar => {
                command.as_f64().map(|v| self.float(v, precision))
            }
            'c' | 'C' if kind == CommandType::Scalar => command
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .and_then(char::from_u32)
                .map(String::from),
            's' | 'S' if kind == CommandType::String => {
                Some(String::from_utf8_lossy(command.payload()).into_owned())
            }
            's' | 'S' if kind == CommandType::WideString => command.as_wide_string(),
            '@' if kind == CommandType::Object => Some(object(command)),
            'p' if kind == CommandType::Scalar => command.as_u64().map(|v| format!("0x{v:x}")),
            'P' if kind == CommandType::Data => Some(hex(command.payload())),
            'm' if kind == CommandType::Errno => command
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(strerror),
            _ => None,
        }
    }

    fn sign(&self, text: String) -> String {
        if text.starts_with('-') {
            text
        } else if self.plus {
            format!("+{text}")
        } else if self.space {
            format!(" {text}")
        } else {
            text
        }
    }

    fn unsigned(&self, value: u64) -> String {
        match (self.conversion, self.alternate) {
            ('o', false) => format!("{value:o}"),
            ('o', true) => format!("0{value:o}"),
            ('x', false) => format!("{value:x}"),
            ('x', true) => format!("{value:#x}"),
            ('X', false) => format!("{value:X}"),
            ('X', true) => format!("0X{value:X}"),
            _ => value.to_string(),
        }
    }

    fn float(&self, value: f64, precision: Option<usize>) -> String {
        let text = if value.is_nan() {
            "nan".to_string()
        } else if value.is_infinite() {
            let text = if value < 0.0 { "-inf" } else { "inf" };
            text.to_string()
        } else {
            let precision = precision.unwrap_or(6);
            match self.conversion.to_ascii_lowercase() {
                'a' | 'e' => exponent(value, precision),
                'g' => general(value, precision, self.alternate),
                _ => format!("{:.*}", precision, value),
            }
        };

        let text = if self.conversion.is_ascii_uppercase() {
            text.to_uppercase()
        } else {
            text
        };

        self.sign(text)
    }

    fn pad(&self, output: &mut String, text: &str, width: Option<usize>, left: bool) {
        let fill = min(width.unwrap_or(0), FIELD_LIMIT)
            .saturating_sub(text.chars().count());

        if fill == 0 {
            output.push_str(text);
        } else if left {
            output.push_str(text);
            output.extend(core::iter::repeat(' ').take(fill));
        } else if self.zero && self.numeric() {
            let signed = text.starts_with(|c: char| matches!(c, '-' | '+' | ' '));
            let (sign, digits) = text.split_at(usize::from(signed));
            output.push_str(sign);
            output.extend(core::iter::repeat('0').take(fill));
            output.push_str(digits);
        } else {
            output.extend(core::iter::repeat(' ').take(fill));
            output.push_str(text);
        }
    }
}

/// `%e` style: one digit before the point and a signed exponent of at least
/// two digits.
fn exponent(value: f64, precision: usize) -> String {
    let text = format!("{:.*e}", precision, value);
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        None => text,
    }
}

/// `%g` style: the shorter of `%e` and `%f` for the given significant digits,
/// with trailing zeros removed unless `#` was given.
fn general(value: f64, precision: usize, alternate: bool) -> String {
    let precision = precision.max(1);

    let exp = format!("{:.*e}", precision - 1, value)
        .split_once('e')
        .and_then(|(_, exp)| exp.parse::<i32>().ok())
        .unwrap_or(0);

    let text = if exp < -4 || exp >= precision as i32 {
        exponent(value, precision - 1)
    } else {
        format!("{:.*}", (precision as i32 - 1 - exp) as usize, value)
    };

    if alternate {
        return text;
    }

    match text.split_once('e') {
        Some((mantissa, exp)) => format!("{}e{exp}", trim_zeros(mantissa)),
        None => trim_zeros(&text).to_string(),
    }
}

fn trim_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Objects carry either inline text or an 8 byte handle.
fn object(command: &Command<'_>) -> String {
    match command.as_str() {
        Some(text) if !text.chars().any(char::is_control) => text.to_string(),
        _ if command.payload().len() == 8 => command
            .as_u64()
            .map(|handle| ObjectRef::new(handle).to_string())
            .unwrap_or_default(),
        _ => hex(command.payload()),
    }
}

fn hex(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(text, "{byte:02x}");
    }
    text
}

fn strerror(errno: i32) -> String {
    let text = std::io::Error::from_raw_os_error(errno).to_string();
    match text.rfind(" (os error") {
        Some(end) => text[..end].to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logpack::{encode, Config, Value};

    fn rendered(format: &str, args: &[Value<'_>]) -> String {
        render(&encode(format, args, 0).unwrap(), false)
    }

    #[test]
    fn literals() {
        assert_eq!(rendered("100%% sure", &[]), "100% sure");
        assert_eq!(rendered("", &[]), "");
    }

    #[test]
    fn integers() {
        assert_eq!(rendered("%d and %i", &[(-7).into(), 8.into()]), "-7 and 8");
        assert_eq!(rendered("%+d % d", &[5.into(), 5.into()]), "+5  5");
        assert_eq!(
            rendered("%x %#X %o %u", &[255.into(), 255.into(), 8.into(), 3u32.into()]),
            "ff 0XFF 10 3"
        );
        assert_eq!(rendered("%lld", &[i64::MIN.into()]), i64::MIN.to_string());
    }

    #[test]
    fn widths() {
        assert_eq!(
            rendered("%5d|%-5d|%05d", &[42.into(), 42.into(), 42.into()]),
            "   42|42   |00042"
        );
        assert_eq!(rendered("%*d|", &[4.into(), 7.into()]), "   7|");
        assert_eq!(rendered("%*d|", &[(-4).into(), 7.into()]), "7   |");
        assert_eq!(rendered("%06d", &[(-42).into()]), "-00042");
    }

    #[test]
    fn field_limits() {
        let text = rendered("%.*f", &[100_000.into(), 1.5.into()]);
        assert!(text.starts_with("1.5000"));
        assert_eq!(text.len(), 2 + FIELD_LIMIT);

        let text = rendered("%.*e", &[i32::MAX.into(), 1.5.into()]);
        assert!(text.starts_with("1.5000"));
        assert!(text.ends_with("e+00"));

        let text = rendered("%.*g", &[i32::MAX.into(), 0.25.into()]);
        assert_eq!(text, "0.25");

        let text = rendered("%*d", &[i32::MIN.into(), 7.into()]);
        assert_eq!(text.len(), FIELD_LIMIT);
        assert!(text.starts_with('7'));

        let text = rendered("%99999999999999999999999d", &[7.into()]);
        assert_eq!(text.len(), FIELD_LIMIT);
    }

    #[test]
    fn floats() {
        assert_eq!(rendered("%f", &[1.5.into()]), "1.500000");
        assert_eq!(rendered("%.*f", &[3.into(), 2.71828.into()]), "2.718");
        assert_eq!(rendered("%.2f", &[Value::Float(2.5, Some(4))]), "2.50");
        assert_eq!(rendered("%f", &[Value::Float(2.5, Some(1))]), "2.5");
        assert_eq!(rendered("%e", &[1234.5.into()]), "1.234500e+03");
        assert_eq!(rendered("%E", &[0.00012.into()]), "1.200000E-04");
        assert_eq!(rendered("%g", &[0.0001.into()]), "0.0001");
        assert_eq!(rendered("%g", &[100000.0.into()]), "100000");
        assert_eq!(rendered("%g", &[1000000.0.into()]), "1e+06");
        assert_eq!(rendered("%f", &[f64::NAN.into()]), "nan");
        assert_eq!(rendered("%F", &[f64::INFINITY.into()]), "INF");
    }

    #[test]
    fn text() {
        assert_eq!(rendered("%c%c", &['o'.into(), 'k'.into()]), "ok");
        assert_eq!(rendered("[%s]", &["hello".into()]), "[hello]");
        assert_eq!(rendered("[%S]", &["wide".into()]), "[wide]");
        assert_eq!(rendered("[%10s]", &["right".into()]), "[     right]");
        assert_eq!(rendered("%.3P", &[vec![0xde, 0xad, 0xbe, 0xef].into()]), "deadbe");
        assert_eq!(rendered("%p", &[ObjectRef::new(0x1000).into()]), "0x1000");
    }

    #[test]
    fn objects() {
        assert_eq!(rendered("%@", &["alice".into()]), "alice");
        assert_eq!(
            rendered("%@", &[ObjectRef::new(0xfeed).into()]),
            "<object 0xfeed>"
        );
        // arguments of the wrong type are carried as objects
        assert_eq!(rendered("%d", &["text".into()]), "text");
    }

    #[test]
    fn errno() {
        let message = encode("failed: %m", &[], 2).unwrap();
        let text = render(&message, true);
        assert!(text.starts_with("failed: "));
        assert!(text.len() > "failed: ".len());
        assert!(!text.contains("os error"));
    }

    #[test]
    fn redaction() {
        let message = encode(
            "user %{private}@ failed with code %d",
            &["alice".into(), 42.into()],
            0,
        )
        .unwrap();
        assert_eq!(render(&message, true), "user <private> failed with code 42");
        assert_eq!(render(&message, false), "user alice failed with code 42");

        // strings are private unless marked public
        let message = encode("%s %{public}s", &["a".into(), "b".into()], 0).unwrap();
        assert_eq!(render(&message, true), "<private> b");

        // numbers are public unless marked private
        let message = encode("%d %{private}d", &[1.into(), 2.into()], 0).unwrap();
        assert_eq!(render(&message, true), "1 <private>");
    }

    #[test]
    fn truncated() {
        let config = Config::builder().max_commands(1).build().unwrap();
        let message = config.encode("%d %d", &[1.into(), 2.into()], 0).unwrap();
        assert!(message.is_truncated());
        assert_eq!(render(&message, true), format!("1 {MISSING}"));
    }
}
