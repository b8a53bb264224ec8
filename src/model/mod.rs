pub mod note;
pub mod token;

pub use note::{number_notes, pitch_to_name, Note, NumberedNote};
pub use token::{CompoundToken, Token, TokenStream, TokenType, TokenValue};
