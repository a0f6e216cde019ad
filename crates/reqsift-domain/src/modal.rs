//! Modal verb vocabulary for non-functional requirements

use std::fmt;

/// Modal verb used to reword a non-functional requirement
///
/// Each verb signals a distinct importance tier, from critical (`must`)
/// down to a possible capability (`can`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalVerb {
    /// Critical requirement
    Must,

    /// Mandatory standard requirement
    Shall,

    /// Recommended requirement
    Should,

    /// Optional feature
    May,

    /// Possible capability
    Can,
}

impl ModalVerb {
    /// All verbs, strongest first
    pub const ALL: [ModalVerb; 5] = [
        ModalVerb::Must,
        ModalVerb::Shall,
        ModalVerb::Should,
        ModalVerb::May,
        ModalVerb::Can,
    ];

    /// Get the verb as it is written in a requirement
    pub fn as_str(&self) -> &'static str {
        match self {
            ModalVerb::Must => "must",
            ModalVerb::Shall => "shall",
            ModalVerb::Should => "should",
            ModalVerb::May => "may",
            ModalVerb::Can => "can",
        }
    }

    /// Importance level the verb communicates
    pub fn importance(&self) -> &'static str {
        match self {
            ModalVerb::Must => "critical requirement",
            ModalVerb::Shall => "mandatory standard requirement",
            ModalVerb::Should => "recommended requirement",
            ModalVerb::May => "optional feature",
            ModalVerb::Can => "possible capability",
        }
    }

    /// Parse a single word (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "must" => Some(ModalVerb::Must),
            "shall" => Some(ModalVerb::Shall),
            "should" => Some(ModalVerb::Should),
            "may" => Some(ModalVerb::May),
            "can" => Some(ModalVerb::Can),
            _ => None,
        }
    }

    /// Find the first modal verb used in a description
    ///
    /// Matches whole words only, so "canvas" or "mayor" do not count.
    ///
    /// # Examples
    ///
    /// ```
    /// use reqsift_domain::ModalVerb;
    ///
    /// assert_eq!(
    ///     ModalVerb::detect("The system shall respond within 2s."),
    ///     Some(ModalVerb::Shall)
    /// );
    /// assert_eq!(ModalVerb::detect("Responds quickly."), None);
    /// ```
    pub fn detect(description: &str) -> Option<Self> {
        description
            .split(|c: char| !c.is_alphabetic())
            .find_map(ModalVerb::parse)
    }
}

impl fmt::Display for ModalVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModalVerb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid modal verb: {}", s))
    }
}
