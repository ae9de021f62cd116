mod attack;
mod block;
mod cbc;
mod crack;
mod decrypt;
mod error;
mod forge;
pub mod http;
mod oracle;
mod padding;

pub use attack::{AttackConfig, OracleAttack, Strategy};
pub use cbc::{decrypt_aes_128_cbc, encrypt_aes_128_cbc, AES_BLOCK_SIZE};
pub use crack::crack_block;
pub use decrypt::{decrypt, decrypt_parallel};
pub use error::{Error, Result};
pub use forge::forge;
pub use http::server::{spawn_service, DEMO_IV, DEMO_KEY, DEMO_MESSAGE};
pub use http::HttpOracle;
pub use oracle::{CbcPaddingOracle, PaddingOracle};
pub use padding::{pkcs7_pad, pkcs7_unpad, strip_padding};
