//! Utility modules

pub mod text;

pub use text::{
    char_len, char_slice, char_to_byte, is_boundary, is_filler, looks_like_email, strip_fillers,
    FILLER,
};
