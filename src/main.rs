use labelscan::{LabelScanner, ScanConfig, UserProfile};
use log::error;
use std::env;

fn mime_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next().map(str::to_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let image_path = args
        .get(1)
        .ok_or("Usage: labelscan <image> [--translate]")?;
    let translate = args.iter().any(|arg| arg == "--translate");

    let config = ScanConfig::load()?;
    let scanner = LabelScanner::from_config(&config)?;

    let image = tokio::fs::read(image_path).await?;
    let mime_type = mime_type_for(image_path);

    match scanner
        .scan_label(&image, mime_type, &UserProfile::default())
        .await
    {
        Ok(result) => {
            let result = if translate {
                scanner.translate_to_hindi(&result).await
            } else {
                result
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(err) => {
            error!("Scan failed: {}", err);
            Err(err.into())
        }
    }
}
