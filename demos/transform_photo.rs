//! Resume photo example - drives a session step by step.
//!
//! Run with: `cargo run --example transform_photo -- <photo.jpg>`
//!
//! Requires `GOOGLE_API_KEY` environment variable.

use resume_photo::{
    EncodedImage, GeminiTransformClient, SessionController, StatusKind, TransformConfig,
};

#[tokio::main]
async fn main() -> resume_photo::Result<()> {
    let input_path = std::env::args()
        .nth(1)
        .expect("Usage: transform_photo <photo.jpg>");

    let photo = EncodedImage::from_path(&input_path)?;
    let client = GeminiTransformClient::new(TransformConfig::from_env());
    let mut session = SessionController::new(client);

    let loaded = session.upload(photo);
    println!("Uploaded {} as attempt {:?}", input_path, loaded.attempt_id);

    let Some(pending) = session.request_transform() else {
        println!("Nothing to transform");
        return Ok(());
    };
    // A second request while processing issues no call.
    assert!(session.request_transform().is_none());
    println!("{}", session.snapshot().status);

    let event = pending.run(session.client()).await;
    let _ = session.handle(event);

    let snapshot = session.snapshot();
    match snapshot.status {
        StatusKind::Succeeded => {
            if let Some(download) = snapshot.download() {
                let path = download.save_to(".")?;
                println!(
                    "Resume photo saved to {} ({} bytes)",
                    path.display(),
                    download.image().size()
                );
            }
        }
        _ => println!(
            "Transform failed: {}",
            snapshot.error_message.unwrap_or_default()
        ),
    }

    Ok(())
}
