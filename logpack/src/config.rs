use crate::command::HEADER_SIZE;
use crate::format::walk;
use crate::{BuildError, Encoder, Error, Message, Value};

/// Initial capacity of a heap-backed message buffer.
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Size a message buffer may grow to before arguments are dropped.
pub const DEFAULT_MAX_CAPACITY: usize = 1024;

/// Number of commands a single message may hold.
pub const DEFAULT_MAX_COMMANDS: u8 = 48;

/// Sizing limits applied when encoding a log statement.
///
/// * `initial_capacity` is the size of the buffer allocated up front
/// * `max_capacity` is the hard ceiling the buffer may grow to, beyond which
///   the message is truncated
/// * `max_commands` is the ceiling on encoded commands, beyond which further
///   arguments are dropped
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    initial_capacity: usize,
    max_capacity: usize,
    max_commands: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_capacity: DEFAULT_MAX_CAPACITY,
            max_commands: DEFAULT_MAX_COMMANDS,
        }
    }
}

impl Config {
    pub fn new(
        initial_capacity: usize,
        max_capacity: usize,
        max_commands: u8,
    ) -> Result<Self, BuildError> {
        if initial_capacity == 0 {
            return Err(BuildError::ZeroCapacity);
        }

        if max_capacity < HEADER_SIZE {
            return Err(BuildError::MaxCapacityTooSmall);
        }

        if max_capacity > u32::MAX as usize {
            return Err(BuildError::MaxCapacityTooLarge);
        }

        if initial_capacity > max_capacity {
            return Err(BuildError::InitialExceedsMax);
        }

        if max_commands == 0 {
            return Err(BuildError::InvalidMaxCommands);
        }

        Ok(Self {
            initial_capacity,
            max_capacity,
            max_commands,
        })
    }

    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn max_commands(&self) -> u8 {
        self.max_commands
    }

    /// Encode a log statement using a heap-backed buffer.
    ///
    /// `errno` is the error number captured at the call site and is consumed
    /// by any `%m` specifier.
    pub fn encode(&self, format: &str, args: &[Value<'_>], errno: i32) -> Result<Message, Error> {
        walk(Encoder::with_config(self), format, args, errno)
    }

    /// Encode a log statement, starting in the provided buffer and moving to
    /// the heap only if the message outgrows it.
    pub fn encode_with_buffer(
        &self,
        buffer: &mut [u8],
        format: &str,
        args: &[Value<'_>],
        errno: i32,
    ) -> Result<Message, Error> {
        walk(Encoder::with_buffer(self, buffer), format, args, errno)
    }
}

/// A builder for an encoder `Config`.
#[derive(Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Set the capacity allocated when encoding begins.
    pub fn initial_capacity(mut self, bytes: usize) -> Self {
        self.config.initial_capacity = bytes;
        self
    }

    /// Set the size beyond which a message is truncated. This includes the
    /// two byte header.
    pub fn max_capacity(mut self, bytes: usize) -> Self {
        self.config.max_capacity = bytes;
        self
    }

    /// Set the maximum number of commands a message may hold. Note that each
    /// floating-point argument uses two commands.
    pub fn max_commands(mut self, commands: u8) -> Self {
        self.config.max_commands = commands;
        self
    }

    /// Consume the builder and validate the resulting `Config`.
    pub fn build(self) -> Result<Config, BuildError> {
        Config::new(
            self.config.initial_capacity,
            self.config.max_capacity,
            self.config.max_commands,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::builder().build().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_commands(), 48);
    }

    #[test]
    fn validation() {
        assert_eq!(
            Config::builder().initial_capacity(0).build(),
            Err(BuildError::ZeroCapacity)
        );
        assert_eq!(
            Config::builder()
                .initial_capacity(1)
                .max_capacity(1)
                .build(),
            Err(BuildError::MaxCapacityTooSmall)
        );
        assert_eq!(
            Config::builder()
                .initial_capacity(4096)
                .max_capacity(1024)
                .build(),
            Err(BuildError::InitialExceedsMax)
        );
        assert_eq!(
            Config::builder().max_commands(0).build(),
            Err(BuildError::InvalidMaxCommands)
        );
        assert!(Config::new(2, 2, 1).is_ok());
    }
}
