//! Pipeline stages for a document upload.
//!
//! ## Data Flow
//!
//! ```text
//! read ──▶ encode ──▶ payload ──▶ transport
//! (locator)  (base64)   (batch)     (form POST)
//! ```
//!
//! 1. [`read`]     : fetch a picked file's bytes from a path, URL or data URI
//! 2. [`encode`]   : enforce the size ceiling, sanitize the name, base64 the bytes
//! 3. [`payload`]  : encode every present file in order and attach the identity
//! 4. [`transport`]: send one POST and interpret the response; the only stage
//!    that talks to the endpoint

pub mod encode;
pub mod payload;
pub mod read;
pub mod transport;
