use nutype::nutype;

pub const MAX_KEY_LENGTH: usize = 256;

/// A preference key: trimmed, non-empty, at most [`MAX_KEY_LENGTH`] characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = MAX_KEY_LENGTH),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        AsRef,
        Deref,
        TryFrom,
        Into,
        Hash,
        Borrow,
        Display,
        Serialize,
        Deserialize,
    )
)]
pub struct Key(String);
