pub mod alphabet;
pub mod cipher;
pub mod config;
pub mod consts;
pub mod error;
pub mod key;
pub mod model;
pub mod optimizer;
pub mod scorer;
// cmd and reports are binary modules (declared in main.rs).

pub use alphabet::Alphabet;
pub use error::{CfResult, CipherError};
pub use key::Key;
pub use model::{build_model, Normalization, TransitionMatrix};
pub use optimizer::search;
pub use scorer::{plausibility, Scorer};
