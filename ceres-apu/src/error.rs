use core::{error, fmt};
use fmt::Display;

#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    InvalidSaveStateBlock { name: [u8; 4] },
    SaveStateTooShort,
    TrailingSaveStateData { remaining: usize },
    UnsupportedSaveStateVersion { major: u16, minor: u16 },
}

impl Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSaveStateBlock { name } => {
                write!(
                    f,
                    "invalid save state block: {}",
                    name.escape_ascii()
                )
            }
            Self::SaveStateTooShort => write!(f, "save state ended unexpectedly"),
            Self::TrailingSaveStateData { remaining } => {
                write!(f, "save state has {remaining} unread bytes after its end block")
            }
            Self::UnsupportedSaveStateVersion { major, minor } => {
                write!(f, "unsupported save state version {major}.{minor}")
            }
        }
    }
}

impl error::Error for Error {}
