// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive CLI.
//
// Module responsibilities:
// - `config`: base URL, output directory and timeout resolution.
// - `error`: request failure kinds and the user-facing alert text.
// - `media`: in-memory image handles (preview/result) and MIME helpers.
// - `session`: the upload state record and its phase transitions.
// - `api`: HTTP call to the colorization service.
// - `app`: controller joining session, backend and alerts.
// - `ui`: terminal menus, spinner and output.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod media;
pub mod session;
pub mod ui;
