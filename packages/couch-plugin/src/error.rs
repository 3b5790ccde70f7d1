#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Client(#[from] couch_client::Error),

    #[error("Plugin {name} already registered")]
    AlreadyRegistered { name: String },
}

impl From<couch_client::ConfigError> for Error {
    fn from(error: couch_client::ConfigError) -> Self {
        Error::Client(error.into())
    }
}
