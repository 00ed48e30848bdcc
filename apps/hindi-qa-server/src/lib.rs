//! Hindi QA Server Library
//!
//! OCR for photographed Hindi documents and question-answer generation over
//! the recognized text. The server binary is in main.rs.
//!
//! # Modules
//!
//! - `imaging`: decoding and enhancement of uploaded rasters
//! - `ocr`: neural and Tesseract engines with quality-based fallback
//! - `qa`: sentence segmentation, question generation, answer extraction
//! - `routes`: HTTP endpoints

pub mod config;
pub mod error;
pub mod imaging;
pub mod ocr;
pub mod qa;
pub mod routes;
pub mod state;
pub mod upload;
