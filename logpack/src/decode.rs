//! Reads a command stream back into its header and commands.

use crate::command::{DESCRIPTOR_SIZE, HEADER_SIZE};
use crate::{Command, CommandFlags, CommandType, DecodeError, Header};

/// A decoded command stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded<'a> {
    header: Header,
    commands: Vec<Command<'a>>,
}

impl<'a> Decoded<'a> {
    pub fn header(&self) -> Header {
        self.header
    }

    pub fn commands(&self) -> &[Command<'a>] {
        &self.commands
    }
}

/// Decode a buffer produced by an `Encoder`, checking that every command is
/// complete and that the header count matches.
pub fn decode(buffer: &[u8]) -> Result<Decoded<'_>, DecodeError> {
    if buffer.len() < HEADER_SIZE {
        return Err(DecodeError::MissingHeader);
    }

    let header = Header::from_bytes([buffer[0], buffer[1]]);
    let mut commands = Vec::with_capacity(header.count() as usize);
    let mut offset = HEADER_SIZE;

    while offset < buffer.len() {
        let index = commands.len();

        if offset + DESCRIPTOR_SIZE > buffer.len() {
            return Err(DecodeError::TruncatedCommand { index });
        }

        let tag = buffer[offset] >> 4;
        let flags = CommandFlags::from_bits(buffer[offset]);
        let size = buffer[offset + 1] as usize;

        let kind = CommandType::from_tag(tag).ok_or(DecodeError::UnknownType { index, tag })?;

        let start = offset + DESCRIPTOR_SIZE;
        let end = start + size;
        if end > buffer.len() {
            return Err(DecodeError::TruncatedCommand { index });
        }

        commands.push(Command {
            kind,
            flags,
            payload: &buffer[start..end],
        });

        offset = end;
    }

    if commands.len() != header.count() as usize {
        return Err(DecodeError::CountMismatch {
            header: header.count(),
            actual: commands.len(),
        });
    }

    Ok(Decoded { header, commands })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stream() {
        let decoded = decode(&[0, 0]).unwrap();
        assert_eq!(decoded.header().count(), 0);
        assert!(decoded.commands().is_empty());
    }

    #[test]
    fn malformed() {
        assert_eq!(decode(&[0]), Err(DecodeError::MissingHeader));
        assert_eq!(
            decode(&[0, 1, 0x00]),
            Err(DecodeError::TruncatedCommand { index: 0 })
        );
        assert_eq!(
            decode(&[0, 1, 0x00, 4, 1, 2]),
            Err(DecodeError::TruncatedCommand { index: 0 })
        );
        assert_eq!(
            decode(&[0, 1, 0x90, 0]),
            Err(DecodeError::UnknownType { index: 0, tag: 9 })
        );
        assert_eq!(
            decode(&[0, 2, 0x00, 1, 7]),
            Err(DecodeError::CountMismatch {
                header: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn commands() {
        let decoded = decode(&[0x01, 2, 0x11, 1, 9, 0x40, 0]).unwrap();
        assert!(decoded.header().has_private());
        assert_eq!(decoded.commands()[0].kind(), CommandType::Count);
        assert_eq!(decoded.commands()[0].flags(), CommandFlags::PRIVATE);
        assert_eq!(decoded.commands()[0].payload(), &[9]);
        assert_eq!(decoded.commands()[1].kind(), CommandType::Object);
        assert!(decoded.commands()[1].payload().is_empty());
    }
}
