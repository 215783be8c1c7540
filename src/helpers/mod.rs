mod duration;
mod load_dotenv;

pub use duration::parse_duration;
pub use load_dotenv::load_dotenv;
