//! Tagged-value codec, event decoding, and a thin client handle for the libmpv client API.

/// Wire formats, value codec, event decoding, ownership guards, and the client handle.
pub mod mpv;
