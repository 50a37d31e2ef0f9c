#[derive(Debug)]
pub enum Error {
    Apu(ceres_apu::Error),
    Io(std::io::Error),
    Script(serde_json::Error),
    Tracing(Box<dyn std::error::Error + Send + Sync>),
    UnsortedScript { index: usize },
}

impl std::error::Error for Error {}
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Apu(err) => write!(f, "apu error: {err}"),
            Self::Io(err) => write!(f, "os error: {err}"),
            Self::Script(err) => write!(f, "register script error: {err}"),
            Self::Tracing(err) => write!(f, "tracing error: {err}"),
            Self::UnsortedScript { index } => {
                write!(f, "register script write {index} is scheduled before the previous one")
            }
        }
    }
}

impl From<ceres_apu::Error> for Error {
    fn from(err: ceres_apu::Error) -> Self {
        Self::Apu(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Script(err)
    }
}
