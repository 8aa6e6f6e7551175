pub mod image_file_handoff;
