use include_dir::{include_dir, Dir};
use std::fs;
use std::path::Path;
use tracing::{error, info};

static SAMPLE_DIR: Dir = include_dir!("sample");

pub fn generate_template(format: String) {
    info!("Generating emit template: {}", format);
    match format.as_str() {
        "js" => {
            println!("{}", crate::export::to_js::get_template());
        }
        _ => {
            error!("Unsupported format: {} - use js", format);
        }
    }
}

pub fn generate_sample(dir: String) {
    info!("Generating sample project: {:?}", dir);
    let target_path = Path::new(&dir);
    if let Err(e) = fs::create_dir_all(target_path) {
        error!("Failed to create target directory: {:?}", e);
        return;
    }

    for file in SAMPLE_DIR.files() {
        let target_file_path = target_path.join(file.path());

        if let Some(parent) = target_file_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create directory: {:?}", e);
                return;
            }
        }

        if let Err(e) = fs::write(&target_file_path, file.contents()) {
            error!("Failed to write file: {:?}", e);
            return;
        }
    }

    info!("Sample project generated successfully at: {:?}", dir);
}
