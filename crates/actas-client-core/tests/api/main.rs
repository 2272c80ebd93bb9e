#![cfg(not(target_arch = "wasm32"))]

mod actas;
mod helpers;
mod login;
mod refresh;
