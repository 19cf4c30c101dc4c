use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("unable to load configuration")]
    Config,
    #[display("no usable browser")]
    Browser,
    #[display("unable to prepare downloader")]
    Download,
    #[display("check failed")]
    Check,
}
