// hostposix - a flat POSIX call surface for a managed-language runtime.
//
// Every exported function marshals its arguments, performs one OS call and
// translates the result into an FFI-safe value (flat structs and sentinel
// integers instead of signals or exceptions). No OS state is cached and no
// failure is recovered from here; this layer translates and forwards.

#![allow(unused_imports)]

pub mod constants;
pub mod dispatcher;
pub mod interface;
pub mod tests;
