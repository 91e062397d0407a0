// Error type shared by the window, camera, detector and export code.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed

    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed

    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed

    #[error("Hand detector error: {0}")]
    Detector(String), // The landmark source failed for this frame

    #[error("Landmark replay error: {0}")]
    Replay(#[from] serde_json::Error), // A replay line was not valid JSON

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError), // Encoding/decoding an image failed

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
