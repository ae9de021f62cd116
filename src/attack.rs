// A configured attack: block size, strategy and the oracle it runs against.
use log::debug;

use crate::block::check_block_size;
use crate::{decrypt, decrypt_parallel, forge, PaddingOracle, Result};

/// How block pairs are worked through when decrypting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// One pair at a time, last block first.
    #[default]
    Sequential,
    /// All pairs at once on the rayon thread pool.
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackConfig {
    pub block_size: usize,
    pub strategy: Strategy,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            block_size: 16,
            strategy: Strategy::Sequential,
        }
    }
}

impl AttackConfig {
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn parallel(mut self) -> Self {
        self.strategy = Strategy::Parallel;
        self
    }
}

/// A padding oracle attack against one oracle with a fixed block size.
pub struct OracleAttack<O> {
    config: AttackConfig,
    oracle: O,
}

impl<O: PaddingOracle> OracleAttack<O> {
    pub fn new(config: AttackConfig, oracle: O) -> Result<Self> {
        check_block_size(config.block_size)?;
        Ok(Self { config, oracle })
    }

    pub fn config(&self) -> &AttackConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Decrypts everything but the first block of `ciphertext`.
    pub fn decrypt(&self, ciphertext: &[u8], strip_padding: bool) -> Result<Vec<u8>> {
        debug!(
            "decrypting {} blocks ({:?})",
            ciphertext.len() / self.config.block_size,
            self.config.strategy
        );
        match self.config.strategy {
            Strategy::Sequential => {
                decrypt(ciphertext, self.config.block_size, &self.oracle, strip_padding)
            }
            Strategy::Parallel => {
                decrypt_parallel(ciphertext, self.config.block_size, &self.oracle, strip_padding)
            }
        }
    }

    /// Decrypts the ciphertext the oracle supplies.
    pub fn decrypt_intercepted(&self, strip_padding: bool) -> Result<Vec<u8>> {
        let ciphertext = self.oracle.supply()?;
        self.decrypt(&ciphertext, strip_padding)
    }

    /// Builds a ciphertext the oracle's server decrypts to `plaintext`. See
    /// [`forge`] for the layout of the result.
    pub fn encrypt(&self, plaintext: &[u8], terminal_block: Option<&[u8]>) -> Result<Vec<u8>> {
        debug!("forging {} blocks", plaintext.len() / self.config.block_size);
        forge(plaintext, self.config.block_size, &self.oracle, terminal_block)
    }
}
