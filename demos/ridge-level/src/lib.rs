use wasm_bindgen::prelude::*;
use ridge_engine::*;

ridge_web::export_game!(GameSession, "ridge-level");
