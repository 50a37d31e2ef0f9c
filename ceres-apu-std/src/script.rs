use crate::Error;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

/// A register write issued by the CPU before master cycle `cycle` runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedWrite {
    pub cycle: u64,
    pub address: u16,
    pub value: u8,
}

/// Register writes sorted by cycle, stands in for the program a CPU would run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    writes: Vec<TimedWrite>,
}

impl Script {
    /// Reads a JSON script from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read, isn't a valid script or its
    /// writes aren't sorted by cycle.
    #[inline]
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let reader = BufReader::new(File::open(path)?);
        let script: Self = serde_json::from_reader(reader)?;
        script.validate()
    }

    /// Parses a JSON script.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` isn't a valid script or its writes aren't
    /// sorted by cycle.
    #[inline]
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let script: Self = serde_json::from_str(json)?;
        script.validate()
    }

    /// Builds a script from writes sorted by cycle.
    ///
    /// # Errors
    ///
    /// Returns an error if the writes aren't sorted by cycle.
    #[inline]
    pub fn new(writes: Vec<TimedWrite>) -> Result<Self, Error> {
        Self { writes }.validate()
    }

    #[must_use]
    #[inline]
    pub fn writes(&self) -> &[TimedWrite] {
        &self.writes
    }

    fn validate(self) -> Result<Self, Error> {
        match self
            .writes
            .windows(2)
            .position(|pair| pair[1].cycle < pair[0].cycle)
        {
            Some(index) => Err(Error::UnsortedScript { index: index + 1 }),
            None => Ok(self),
        }
    }
}
