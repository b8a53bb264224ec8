//! Tokens produced by the external tokenizer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Kind of an elementary token
///
/// The known kinds are the ones the annotator reacts to, plus the common
/// structural kinds. Any other name round-trips through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TokenType {
    Pitch,
    PitchDrum,
    NoteOn,
    NoteOff,
    DrumOn,
    DrumOff,
    Velocity,
    Duration,
    MicroTiming,
    Position,
    Bar,
    TimeShift,
    TimeSig,
    Tempo,
    Rest,
    Chord,
    Program,
    Family,
    Pedal,
    PedalOff,
    PitchBend,
    Ignore,
    Other(String),
}

impl TokenType {
    pub fn as_str(&self) -> &str {
        match self {
            TokenType::Pitch => "Pitch",
            TokenType::PitchDrum => "PitchDrum",
            TokenType::NoteOn => "NoteOn",
            TokenType::NoteOff => "NoteOff",
            TokenType::DrumOn => "DrumOn",
            TokenType::DrumOff => "DrumOff",
            TokenType::Velocity => "Velocity",
            TokenType::Duration => "Duration",
            TokenType::MicroTiming => "MicroTiming",
            TokenType::Position => "Position",
            TokenType::Bar => "Bar",
            TokenType::TimeShift => "TimeShift",
            TokenType::TimeSig => "TimeSig",
            TokenType::Tempo => "Tempo",
            TokenType::Rest => "Rest",
            TokenType::Chord => "Chord",
            TokenType::Program => "Program",
            TokenType::Family => "Family",
            TokenType::Pedal => "Pedal",
            TokenType::PedalOff => "PedalOff",
            TokenType::PitchBend => "PitchBend",
            TokenType::Ignore => "Ignore",
            TokenType::Other(name) => name.as_str(),
        }
    }

    /// Onset marker of the pitch-based families
    pub fn is_pitch(&self) -> bool {
        matches!(self, TokenType::Pitch | TokenType::PitchDrum)
    }

    /// Onset marker of the on/off pairing family
    pub fn is_note_on(&self) -> bool {
        matches!(self, TokenType::NoteOn | TokenType::DrumOn)
    }

    /// Offset marker of the on/off pairing family
    pub fn is_note_off(&self) -> bool {
        matches!(self, TokenType::NoteOff | TokenType::DrumOff)
    }
}

impl From<&str> for TokenType {
    fn from(name: &str) -> Self {
        match name {
            "Pitch" => TokenType::Pitch,
            "PitchDrum" => TokenType::PitchDrum,
            "NoteOn" => TokenType::NoteOn,
            "NoteOff" => TokenType::NoteOff,
            "DrumOn" => TokenType::DrumOn,
            "DrumOff" => TokenType::DrumOff,
            "Velocity" => TokenType::Velocity,
            "Duration" => TokenType::Duration,
            "MicroTiming" => TokenType::MicroTiming,
            "Position" => TokenType::Position,
            "Bar" => TokenType::Bar,
            "TimeShift" => TokenType::TimeShift,
            "TimeSig" => TokenType::TimeSig,
            "Tempo" => TokenType::Tempo,
            "Rest" => TokenType::Rest,
            "Chord" => TokenType::Chord,
            "Program" => TokenType::Program,
            "Family" => TokenType::Family,
            "Pedal" => TokenType::Pedal,
            "PedalOff" => TokenType::PedalOff,
            "PitchBend" => TokenType::PitchBend,
            "Ignore" => TokenType::Ignore,
            other => TokenType::Other(other.to_string()),
        }
    }
}

impl From<String> for TokenType {
    fn from(name: String) -> Self {
        TokenType::from(name.as_str())
    }
}

impl From<TokenType> for String {
    fn from(kind: TokenType) -> Self {
        match kind {
            TokenType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token payload: a number (pitch, velocity, tempo…) or a label
/// ("4/4", "Note", "1.0.8")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    Int(i64),
    Float(f64),
    Text(String),
}

// Floats compare by bit pattern so values can key the pairing map
impl PartialEq for TokenValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TokenValue::Int(a), TokenValue::Int(b)) => a == b,
            (TokenValue::Float(a), TokenValue::Float(b)) => a.to_bits() == b.to_bits(),
            (TokenValue::Text(a), TokenValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TokenValue {}

impl Hash for TokenValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            TokenValue::Int(v) => v.hash(state),
            TokenValue::Float(v) => v.to_bits().hash(state),
            TokenValue::Text(s) => s.hash(state),
        }
    }
}

impl TokenValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TokenValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for TokenValue {
    fn from(v: i64) -> Self {
        TokenValue::Int(v)
    }
}

impl From<i32> for TokenValue {
    fn from(v: i32) -> Self {
        TokenValue::Int(i64::from(v))
    }
}

impl From<f64> for TokenValue {
    fn from(v: f64) -> Self {
        TokenValue::Float(v)
    }
}

impl From<&str> for TokenValue {
    fn from(v: &str) -> Self {
        TokenValue::Text(v.to_string())
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Int(v) => write!(f, "{}", v),
            TokenValue::Float(v) => write!(f, "{}", v),
            TokenValue::Text(s) => f.write_str(s),
        }
    }
}

/// Elementary token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenType,
    pub value: TokenValue,
    /// 1-based global note identity, set by the annotator
    #[serde(default)]
    pub note_id: Option<u32>,
    /// Track index, set by the annotator
    #[serde(default)]
    pub track_id: Option<u32>,
}

impl Token {
    pub fn new(kind: impl Into<TokenType>, value: impl Into<TokenValue>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            note_id: None,
            track_id: None,
        }
    }

    pub fn is_annotated(&self) -> bool {
        self.note_id.is_some() || self.track_id.is_some()
    }
}

/// One beat slot of a compound tokenizer (e.g. Family/Position/Pitch/Velocity/Duration)
pub type CompoundToken = Vec<Token>;

/// Token structure as emitted by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "events", rename_all = "snake_case")]
pub enum TokenStream {
    /// All tracks merged into one stream
    Flat(Vec<Token>),
    /// One stream per track
    PerTrack(Vec<Vec<Token>>),
    /// Compound tokens, one stream per track
    Compound(Vec<Vec<CompoundToken>>),
    /// Compound tokens, all tracks merged into one stream
    FlatCompound(Vec<CompoundToken>),
}

impl TokenStream {
    pub fn shape_name(&self) -> &'static str {
        match self {
            TokenStream::Flat(_) => "flat",
            TokenStream::PerTrack(_) => "per_track",
            TokenStream::Compound(_) => "compound",
            TokenStream::FlatCompound(_) => "flat_compound",
        }
    }

    /// Whether all tracks are merged into a single stream
    pub fn is_single_stream(&self) -> bool {
        matches!(self, TokenStream::Flat(_) | TokenStream::FlatCompound(_))
    }

    /// Iterate over every elementary token in stream order
    pub fn iter_tokens(&self) -> Box<dyn Iterator<Item = &Token> + '_> {
        match self {
            TokenStream::Flat(events) => Box::new(events.iter()),
            TokenStream::PerTrack(tracks) => Box::new(tracks.iter().flatten()),
            TokenStream::Compound(tracks) => Box::new(tracks.iter().flatten().flatten()),
            TokenStream::FlatCompound(events) => Box::new(events.iter().flatten()),
        }
    }

    pub fn token_count(&self) -> usize {
        self.iter_tokens().count()
    }

    /// Whether any token already carries a note or track identity
    pub fn is_annotated(&self) -> bool {
        self.iter_tokens().any(Token::is_annotated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_names() {
        assert_eq!(TokenType::from("Pitch"), TokenType::Pitch);
        assert_eq!(TokenType::from("NoteOff"), TokenType::NoteOff);
        assert_eq!(
            TokenType::from("Pitch-Bend"),
            TokenType::Other("Pitch-Bend".to_string())
        );
        assert_eq!(String::from(TokenType::TimeSig), "TimeSig");
        assert_eq!(TokenType::Other("BOS".to_string()).to_string(), "BOS");
    }

    #[test]
    fn test_token_json_shape() {
        let token: Token = serde_json::from_str(r#"{"type": "TimeSig", "value": "4/4"}"#).unwrap();
        assert_eq!(token.kind, TokenType::TimeSig);
        assert_eq!(token.value, TokenValue::Text("4/4".to_string()));
        assert!(!token.is_annotated());

        let mut token = Token::new("Pitch", 60);
        token.note_id = Some(3);
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["type"], "Pitch");
        assert_eq!(json["value"], 60);
        assert_eq!(json["note_id"], 3);
        assert!(json["track_id"].is_null());
    }

    #[test]
    fn test_token_values() {
        let tempo: Token = serde_json::from_str(r#"{"type": "Tempo", "value": 121.29}"#).unwrap();
        assert_eq!(tempo.value, TokenValue::Float(121.29));
        let pitch: Token = serde_json::from_str(r#"{"type": "Pitch", "value": 60}"#).unwrap();
        assert_eq!(pitch.value, TokenValue::Int(60));
        assert_ne!(TokenValue::Int(60), TokenValue::Float(60.0));
        assert_eq!(TokenValue::from("Note").as_text(), Some("Note"));
        assert_eq!(TokenValue::Int(60).as_text(), None);
    }

    #[test]
    fn test_stream_shape_tag() {
        let stream: TokenStream = serde_json::from_str(
            r#"{"shape": "per_track", "events": [[{"type": "Bar", "value": "None"}], []]}"#,
        )
        .unwrap();
        assert_eq!(stream.shape_name(), "per_track");
        assert!(!stream.is_single_stream());
        assert_eq!(stream.token_count(), 1);
    }

    #[test]
    fn test_iter_tokens_compound() {
        let stream = TokenStream::Compound(vec![
            vec![vec![Token::new("Family", "Note"), Token::new("Pitch", 60)]],
            vec![vec![Token::new("Family", "Metric"), Token::new("Bar", "None")]],
        ]);
        let kinds: Vec<_> = stream.iter_tokens().map(|t| t.kind.as_str()).collect();
        assert_eq!(kinds, ["Family", "Pitch", "Family", "Bar"]);
        assert!(!stream.is_annotated());
    }
}
