//! Configuration section definitions.
//!
//! Each module corresponds to a section in `marka.toml`:
//!
//! | Module   | TOML Section | Purpose                                  |
//! |----------|--------------|------------------------------------------|
//! | `theme`  | `[theme]`    | Light/dark mapping, palettes, transitions|
//! | `render` | `[render]`   | Image root, code highlighting            |
//! | `crypto` | `[crypto]`   | Encrypted article tag                    |

mod crypto;
mod render;
mod theme;

pub use crypto::CryptoConfig;
pub use render::RenderConfig;
pub use theme::ThemeConfig;
