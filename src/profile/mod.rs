mod services;

pub use services::{avatar_data_uri, ProfileEditor};
