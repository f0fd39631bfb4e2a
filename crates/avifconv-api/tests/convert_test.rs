mod helpers;

use avifconv_core::Config;
use axum_test::multipart::{MultipartForm, Part};
use base64::{engine::general_purpose::STANDARD, Engine};
use helpers::fixtures::{avif_dimensions, create_test_jpeg, encode_jpeg, file_form, load_fixture};
use helpers::{setup_test_app, setup_test_app_with, test_config};
use image::{DynamicImage, GrayImage, Luma};
use serde_json::Value;

fn decode_variant(variant: &Value) -> Vec<u8> {
    STANDARD
        .decode(variant["content"].as_str().unwrap())
        .unwrap()
}

#[tokio::test]
async fn test_convert_returns_full_and_thumbnail() {
    let server = setup_test_app();

    let response = server
        .post("/convert")
        .multipart(file_form("IMG_0001.JPG", create_test_jpeg(400, 320)))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["original_filename"], "IMG_0001.JPG");

    let variants = body["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 2);

    let full = &variants[0];
    assert_eq!(full["variant"], "full");
    assert_eq!(full["filename"], "IMG_0001.avif");
    assert_eq!(full["mimetype"], "image/avif");
    let full_bytes = decode_variant(full);
    assert_eq!(full["size"].as_u64().unwrap() as usize, full_bytes.len());
    assert_eq!(avif_dimensions(&full_bytes), (400, 320));

    let thumb = &variants[1];
    assert_eq!(thumb["variant"], "thumbnail");
    assert_eq!(thumb["filename"], "IMG_0001_thumb.avif");
    let thumb_bytes = decode_variant(thumb);
    assert_eq!(thumb["size"].as_u64().unwrap() as usize, thumb_bytes.len());
    assert_eq!(avif_dimensions(&thumb_bytes), (300, 240));
}

#[tokio::test]
async fn test_thumbnail_never_upscales() {
    let server = setup_test_app();

    let response = server
        .post("/convert")
        .multipart(file_form("small.jpeg", create_test_jpeg(100, 80)))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let thumb = &body["variants"][1];
    assert_eq!(avif_dimensions(&decode_variant(thumb)), (100, 80));
}

#[tokio::test]
async fn test_grayscale_jpeg_is_converted() {
    let server = setup_test_app();
    let gray = encode_jpeg(DynamicImage::ImageLuma8(GrayImage::from_pixel(
        64,
        64,
        Luma([90]),
    )));

    let response = server
        .post("/convert")
        .multipart(file_form("gray.jpg", gray))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(avif_dimensions(&decode_variant(&body["variants"][0])), (64, 64));
}

#[tokio::test]
async fn test_same_input_gives_same_sizes() {
    let server = setup_test_app();
    let jpeg = create_test_jpeg(120, 90);

    let first: Value = server
        .post("/convert")
        .multipart(file_form("a.jpg", jpeg.clone()))
        .await
        .json();
    let second: Value = server
        .post("/convert")
        .multipart(file_form("a.jpg", jpeg))
        .await
        .json();

    assert_eq!(first["variants"][0]["size"], second["variants"][0]["size"]);
    assert_eq!(first["variants"][1]["size"], second["variants"][1]["size"]);
}

#[tokio::test]
async fn test_convert_stream_returns_attachment() {
    let server = setup_test_app();

    let response = server
        .post("/convert-stream")
        .multipart(file_form("holiday.jpg", create_test_jpeg(200, 150)))
        .await;

    response.assert_status_ok();
    let headers = response.headers();
    assert_eq!(headers.get("content-type").unwrap(), "image/avif");
    assert_eq!(
        headers.get("content-disposition").unwrap(),
        "attachment; filename=\"holiday.avif\""
    );

    let bytes = response.as_bytes();
    assert_eq!(
        headers
            .get("content-length")
            .unwrap()
            .to_str()
            .unwrap()
            .parse::<usize>()
            .unwrap(),
        bytes.len()
    );
    assert_eq!(avif_dimensions(bytes), (200, 150));
}

#[tokio::test]
async fn test_convert_jpeg_accepts_jpeg() {
    let server = setup_test_app();

    let response = server
        .post("/convert-jpeg")
        .multipart(file_form("photo.jpeg", create_test_jpeg(50, 50)))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["variants"][0]["filename"], "photo.avif");
    assert_eq!(body["variants"][1]["filename"], "photo_thumb.avif");
}

#[tokio::test]
async fn test_convert_jpeg_rejects_heic() {
    let server = setup_test_app();

    let response = server
        .post("/convert-jpeg")
        .multipart(file_form("photo.heic", b"irrelevant".to_vec()))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["detail"], "Invalid file type. Allowed: .jpg, .jpeg");
    assert_eq!(body["code"], "INVALID_FILE_TYPE");
}

#[tokio::test]
async fn test_convert_jpeg_requires_filename() {
    let server = setup_test_app();
    let form = MultipartForm::new().add_part("file", Part::bytes(create_test_jpeg(10, 10)));

    let response = server.post("/convert-jpeg").multipart(form).await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["detail"], "No filename provided");
}

#[tokio::test]
async fn test_invalid_extension_is_rejected_before_decoding() {
    let server = setup_test_app();

    // Valid JPEG content does not rescue a disallowed extension
    let response = server
        .post("/convert")
        .multipart(file_form("photo.png", create_test_jpeg(10, 10)))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    #[cfg(feature = "heic")]
    let expected = "Invalid file type. Allowed: .heic, .heif, .jpg, .jpeg";
    #[cfg(not(feature = "heic"))]
    let expected = "Invalid file type. Allowed: .jpg, .jpeg";
    assert_eq!(body["detail"], expected);
}

#[tokio::test]
async fn test_missing_file_field() {
    let server = setup_test_app();
    let form = MultipartForm::new().add_text("note", "no file here");

    let response = server.post("/convert").multipart(form).await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["detail"], "No file provided");
}

#[tokio::test]
async fn test_multiple_file_fields_rejected() {
    let server = setup_test_app();
    let form = MultipartForm::new()
        .add_part("file", Part::bytes(create_test_jpeg(10, 10)).file_name("a.jpg"))
        .add_part("file", Part::bytes(create_test_jpeg(10, 10)).file_name("b.jpg"));

    let response = server.post("/convert").multipart(form).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_empty_file_rejected() {
    let server = setup_test_app();

    let response = server
        .post("/convert")
        .multipart(file_form("empty.jpg", Vec::new()))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["detail"], "File is empty");
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let config = Config {
        max_file_size_bytes: 4 * 1024,
        ..test_config()
    };
    let server = setup_test_app_with(config);

    let response = server
        .post("/convert")
        .multipart(file_form("big.jpg", vec![0xAB; 8 * 1024]))
        .await;

    response.assert_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_upload_at_exact_limit_is_accepted_by_validation() {
    let jpeg = create_test_jpeg(32, 32);
    let config = Config {
        max_file_size_bytes: jpeg.len(),
        ..test_config()
    };
    let server = setup_test_app_with(config);

    let response = server
        .post("/convert")
        .multipart(file_form("edge.jpg", jpeg))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_declared_oversize_rejected_without_decoding() {
    let server = setup_test_app();

    let response = server
        .post("/convert")
        .add_header(
            axum::http::header::CONTENT_LENGTH,
            axum::http::HeaderValue::from(60u64 * 1024 * 1024),
        )
        .multipart(file_form("huge.jpg", b"not really huge".to_vec()))
        .await;

    response.assert_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["detail"], "File too large. Maximum size: 50MB");
}

#[tokio::test]
async fn test_undecodable_jpeg_is_conversion_failure() {
    let server = setup_test_app();

    let response = server
        .post("/convert")
        .multipart(file_form("broken.jpg", b"definitely not a jpeg".to_vec()))
        .await;

    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Conversion failed: "));
}

#[cfg(feature = "heic")]
#[tokio::test]
async fn test_jpeg_content_with_heic_extension_is_sniffed() {
    let server = setup_test_app();

    let response = server
        .post("/convert")
        .multipart(file_form("mislabeled.HEIC", create_test_jpeg(40, 30)))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["variants"][0]["filename"], "mislabeled.avif");
}

#[cfg(feature = "heic")]
#[tokio::test]
async fn test_convert_heic_returns_full_and_thumbnail() {
    let server = setup_test_app();

    let response = server
        .post("/convert")
        .multipart(file_form(
            "IMG_0001.HEIC",
            load_fixture("gradient_402x322.heic"),
        ))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["original_filename"], "IMG_0001.HEIC");

    let variants = body["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 2);

    let full = &variants[0];
    assert_eq!(full["filename"], "IMG_0001.avif");
    assert_eq!(avif_dimensions(&decode_variant(full)), (402, 322));

    let thumb = &variants[1];
    assert_eq!(thumb["filename"], "IMG_0001_thumb.avif");
    let (width, height) = avif_dimensions(&decode_variant(thumb));
    assert_eq!((width, height), (300, 240));
    assert!(width.max(height) <= 300);
}

#[cfg(feature = "heic")]
#[tokio::test]
async fn test_convert_heic_with_alpha() {
    let server = setup_test_app();

    let response = server
        .post("/convert-stream")
        .multipart(file_form("overlay.heif", load_fixture("alpha_64x48.heic")))
        .await;

    response.assert_status_ok();
    let avif = response.as_bytes().to_vec();
    assert_eq!(avif_dimensions(&avif), (64, 48));
}

#[cfg(feature = "heic")]
#[tokio::test]
async fn test_heic_content_with_jpg_extension_is_sniffed() {
    let server = setup_test_app();

    let response = server
        .post("/convert")
        .multipart(file_form("renamed.jpg", load_fixture("gradient_402x322.heic")))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["variants"][0]["filename"], "renamed.avif");
}

#[cfg(not(feature = "heic"))]
#[tokio::test]
async fn test_heic_rejected_when_decoder_is_not_built() {
    let server = setup_test_app();

    let response = server
        .post("/convert")
        .multipart(file_form("IMG_0002.heic", b"\0\0\0\x18ftypheic".to_vec()))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_FILE_TYPE");
    assert_eq!(body["detail"], "Invalid file type. Allowed: .jpg, .jpeg");
}

#[tokio::test]
async fn test_non_multipart_request_rejected() {
    let server = setup_test_app();

    let response = server
        .post("/convert")
        .json(&serde_json::json!({ "file": "IMG_0001.heic" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}
