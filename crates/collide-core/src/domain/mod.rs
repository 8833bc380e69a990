pub mod errors;

pub use errors::{DiagError, DiagErrorCategory, DiagResult, ParserResult};

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisTool {
    IonColl,
    HistoE,
}

impl AnalysisTool {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IonColl => "ION_COLL",
            Self::HistoE => "HISTO_E",
        }
    }

    /// Suffix appended to a run tag to locate the tool's input, if any.
    pub const fn input_suffix(self) -> Option<&'static str> {
        match self {
            Self::IonColl => Some(".ION_coll"),
            Self::HistoE => None,
        }
    }
}

impl Display for AnalysisTool {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}
