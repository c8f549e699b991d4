//! Capture to recipe JSON to display, through real JPEG bytes.

mod common;

use common::{controller, jpeg_bytes, marked_gradient, Camera, Permissions, Picker, Shot};
use sabor_capture::CaptureOutcome;
use sabor_core::recipe::{Difficulty, RecipeCreate};
use sabor_core::{
    decode_raster, rotate, tag_orientation, ImageRef, OrientationTag, PipelineConfig, Renderer,
    TransportPayload,
};

async fn capture(bytes: Vec<u8>) -> TransportPayload {
    let mut ctl = controller(
        Permissions::granted(),
        Camera::scripted([Shot::Deliver(bytes)]),
        Picker::default(),
    );
    ctl.request_capture().unwrap();
    ctl.shutter_pressed().unwrap();
    match ctl.resolve().await.unwrap() {
        CaptureOutcome::Attached(payload) => payload,
        CaptureOutcome::Cancelled => panic!("camera capture cannot be cancelled"),
    }
}

#[tokio::test]
async fn test_tagged_capture_matches_prerotated_capture() {
    let sensor = jpeg_bytes(&marked_gradient(48, 32));

    // Sensor data stored sideways with a tag saying so
    let tagged = tag_orientation(&sensor, OrientationTag::Rotate90).unwrap();
    // The same shot with the pixels already turned upright
    let upright = rotate(&decode_raster(&sensor).unwrap(), 90).unwrap();
    let untagged = jpeg_bytes(&upright);

    let renderer = Renderer::new(PipelineConfig::default());
    let from_tag = renderer.render(&ImageRef::from(capture(tagged).await));
    let from_pixels = renderer.render(&ImageRef::from(capture(untagged).await));

    assert!(!from_tag.is_placeholder());
    assert!(!from_pixels.is_placeholder());
    assert_eq!(from_tag.dimensions(), (32, 48));
    assert_eq!(from_pixels.dimensions(), (32, 48));

    let diff = from_tag.raster().mean_abs_diff(from_pixels.raster()).unwrap();
    assert!(diff < 8.0, "tag and pixel correction diverge: {diff}");

    // And both match what the scene actually looks like
    assert!(from_tag.raster().mean_abs_diff(&upright).unwrap() < 8.0);
}

#[tokio::test]
async fn test_every_rotation_tag_renders_upright() {
    let sensor = jpeg_bytes(&marked_gradient(40, 24));
    let base = decode_raster(&sensor).unwrap();
    let renderer = Renderer::new(PipelineConfig::default());

    for tag in [
        OrientationTag::Normal,
        OrientationTag::Rotate90,
        OrientationTag::Rotate180,
        OrientationTag::Rotate270,
    ] {
        let bytes = tag_orientation(&sensor, tag).unwrap();
        let shown = renderer.render(&ImageRef::from(capture(bytes).await));
        let expected = rotate(&base, tag.degrees()).unwrap();

        assert_eq!(shown.dimensions(), (expected.width, expected.height), "{tag:?}");
        assert!(shown.raster().mean_abs_diff(&expected).unwrap() < 8.0, "{tag:?}");
    }
}

#[tokio::test]
async fn test_payload_survives_recipe_json() {
    let payload = capture(jpeg_bytes(&marked_gradient(20, 20))).await;
    // The scheme prefix keeps the legacy heuristic from reading it as a URL
    assert!(ImageRef::classify(payload.as_str(), usize::MAX).is_inline());

    let mut recipe = RecipeCreate {
        author_id: 1,
        title: "Pão de queijo".to_string(),
        description: None,
        preparation_time: 30,
        servings: 12,
        difficulty: "médio".parse::<Difficulty>().unwrap(),
        image_url: None,
        ingredients: Vec::new(),
        instructions: vec!["Misturar".to_string(), "Assar".to_string()],
        categories: Vec::new(),
    };
    recipe.attach_image::<String>(Ok(ImageRef::from(payload.clone())));

    let json = recipe.to_json().unwrap();
    assert!(!json.contains('\n'));

    let received: RecipeCreate = serde_json::from_str(&json).unwrap();
    let image = received.image_url.expect("image kept");
    assert_eq!(image, ImageRef::inline(payload));

    let shown = Renderer::new(PipelineConfig::default()).render_legacy(image.as_legacy_str());
    assert!(!shown.is_placeholder());
    assert_eq!(shown.dimensions(), (20, 20));
}
