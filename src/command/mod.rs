mod encode;
mod validate;
mod value_types;

pub use encode::encode;
pub use validate::validate;
pub use value_types::value_types;
