//! Folio - portfolio site renderer.
//!
//! | Module     | Role                                                   |
//! |------------|--------------------------------------------------------|
//! | `content`  | descriptor parsers and the text formatter              |
//! | `fetch`    | sources (filesystem, HTTP) behind a caching fetch      |
//! | `store`    | persistent key-value store                             |
//! | `dom`      | view trees with declared interaction handlers          |
//! | `render`   | list/detail controllers, gallery, panels               |
//! | `carousel` | recommendation carousel state machine                  |
//! | `build`    | renders every page into the output directory           |
//! | `serve`    | local server with deep-link support                    |

pub mod build;
pub mod carousel;
pub mod cli;
pub mod config;
pub mod content;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod logger;
pub mod render;
pub mod serve;
pub mod store;
pub mod utils;
