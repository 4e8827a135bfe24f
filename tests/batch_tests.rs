mod common;

use common::{encode, read_zip};
use image::{GenericImageView, ImageFormat};
use pot_pack::{
    run_batch, AddOutcome, BatchConverter, ConvertOptions, ImageStore, MediaType, PackError,
    TrackedImage,
};
use std::sync::Arc;

fn store_with(images: &[(&str, u32, u32, ImageFormat)]) -> ImageStore {
    let mut store = ImageStore::new();
    for &(name, width, height, format) in images {
        let media_type = MediaType::from_image_format(format).unwrap();
        let outcome = store.add(name, encode(width, height, format), media_type).unwrap();
        assert_eq!(outcome, AddOutcome::Added);
    }
    store
}

#[tokio::test]
async fn test_batch_produces_one_entry_per_active_image() {
    let store = store_with(&[
        ("a.png", 100, 50, ImageFormat::Png),
        ("b.jpg", 640, 480, ImageFormat::Jpeg),
        ("c.bmp", 33, 17, ImageFormat::Bmp),
        ("d.png", 64, 64, ImageFormat::Png),
    ]);
    let converter = BatchConverter::new(ConvertOptions::default());

    let report = run_batch(&store, &converter).await.unwrap().unwrap();

    assert!(report.outcome.failures.is_empty());
    let artifact = report.artifact.unwrap();
    assert!(artifact.file_name.starts_with("pot-images-"));
    assert!(artifact.file_name.ends_with(".zip"));

    let entries = read_zip(&artifact.bytes);
    let names: Vec<_> = entries.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["a.png", "b.jpg", "c.bmp", "d.png"]);

    let sizes: Vec<_> = entries
        .iter()
        .map(|(_, payload)| image::load_from_memory(payload).unwrap().dimensions())
        .collect();
    assert_eq!(sizes, vec![(128, 64), (256, 256), (32, 16), (64, 64)]);
}

#[tokio::test]
async fn test_resized_entries_keep_their_media_type() {
    let store = store_with(&[
        ("photo.jpg", 300, 200, ImageFormat::Jpeg),
        ("sprite.png", 300, 200, ImageFormat::Png),
        ("frame.gif", 300, 200, ImageFormat::Gif),
    ]);
    let converter = BatchConverter::new(ConvertOptions::default());

    let report = run_batch(&store, &converter).await.unwrap().unwrap();
    let entries = read_zip(&report.artifact.unwrap().bytes);

    let formats: Vec<_> = entries
        .iter()
        .map(|(_, payload)| image::guess_format(payload).unwrap())
        .collect();
    assert_eq!(
        formats,
        vec![ImageFormat::Gif, ImageFormat::Jpeg, ImageFormat::Png]
    );
}

#[tokio::test]
async fn test_inactive_images_are_left_out() {
    let mut store = store_with(&[
        ("keep.png", 100, 100, ImageFormat::Png),
        ("skip.png", 100, 100, ImageFormat::Png),
    ]);
    store.set_active("skip.png", false).unwrap();
    let converter = BatchConverter::new(ConvertOptions::default());

    let report = run_batch(&store, &converter).await.unwrap().unwrap();
    let entries = read_zip(&report.artifact.unwrap().bytes);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "keep.png");
    assert!(store.get("skip.png").is_some());
}

#[tokio::test]
async fn test_all_inactive_is_a_silent_no_op() {
    let mut store = store_with(&[("only.png", 100, 100, ImageFormat::Png)]);
    store.set_active("only.png", false).unwrap();
    let converter = BatchConverter::new(ConvertOptions::default());

    assert!(run_batch(&store, &converter).await.unwrap().is_none());
}

#[tokio::test]
async fn test_conforming_payloads_are_byte_identical() {
    let store = store_with(&[("tile.jpg", 128, 32, ImageFormat::Jpeg)]);
    let original = store.get("tile.jpg").unwrap().bytes.clone();
    let converter = BatchConverter::new(ConvertOptions::default());

    let report = run_batch(&store, &converter).await.unwrap().unwrap();
    let entries = read_zip(&report.artifact.unwrap().bytes);

    assert_eq!(entries[0].1, original.to_vec());
}

#[tokio::test]
async fn test_repeated_runs_are_deterministic() {
    let store = store_with(&[
        ("a.jpg", 300, 200, ImageFormat::Jpeg),
        ("b.bmp", 90, 45, ImageFormat::Bmp),
        ("c.png", 256, 128, ImageFormat::Png),
    ]);
    let converter = BatchConverter::new(ConvertOptions::default());

    let first = run_batch(&store, &converter).await.unwrap().unwrap();
    let second = run_batch(&store, &converter).await.unwrap().unwrap();

    assert_eq!(
        read_zip(&first.artifact.unwrap().bytes),
        read_zip(&second.artifact.unwrap().bytes)
    );
}

#[tokio::test]
async fn test_failing_image_does_not_abort_the_batch() {
    let converter = BatchConverter::new(ConvertOptions::default());
    let good = TrackedImage {
        name: "good.png".to_string(),
        bytes: encode(100, 50, ImageFormat::Png).into(),
        media_type: MediaType::Png,
        width: 100,
        height: 50,
        active: true,
    };
    let bad = TrackedImage {
        name: "bad.png".to_string(),
        bytes: Arc::from(&b"corrupted after tracking"[..]),
        ..good.clone()
    };

    let outcome = converter.convert(vec![good, bad]).await.unwrap();

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].name, "good.png");
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].name, "bad.png");
    assert!(matches!(outcome.failures[0].error, PackError::Decode(_, _)));
}

#[tokio::test]
async fn test_converter_is_reusable_after_a_run() {
    let store = store_with(&[("a.png", 100, 50, ImageFormat::Png)]);
    let converter = BatchConverter::new(ConvertOptions::default());

    run_batch(&store, &converter).await.unwrap();
    assert!(!converter.is_running());
    assert!(run_batch(&store, &converter).await.is_ok());
}

#[tokio::test]
async fn test_large_fan_out_completes() {
    let mut store = ImageStore::new();
    for i in 0..40 {
        store
            .add(format!("img_{:02}.png", i), encode(30 + i, 20, ImageFormat::Png), MediaType::Png)
            .unwrap();
    }
    let converter = BatchConverter::new(ConvertOptions::new(Some(5), Some(60)).unwrap());

    let report = run_batch(&store, &converter).await.unwrap().unwrap();

    assert_eq!(report.outcome.results.len(), 40);
    assert_eq!(read_zip(&report.artifact.unwrap().bytes).len(), 40);
}

#[tokio::test]
async fn test_gray_alpha_image_packs_under_tiff_name() {
    let mut buf = Vec::new();
    image::DynamicImage::ImageLumaA8(image::GrayAlphaImage::from_fn(100, 50, |x, y| {
        image::LumaA([(x * 2) as u8, (y * 5) as u8])
    }))
    .write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
    .unwrap();

    let mut store = ImageStore::new();
    store.add("mask.tif", buf, MediaType::Tiff).unwrap();
    let converter = BatchConverter::new(ConvertOptions::default());

    let report = run_batch(&store, &converter).await.unwrap().unwrap();

    assert!(report.outcome.failures.is_empty());
    let artifact = report.artifact.expect("archive built");
    let entries = read_zip(&artifact.bytes);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "mask.tif");
    assert_eq!(image::guess_format(&entries[0].1).unwrap(), ImageFormat::Tiff);
    let img = image::load_from_memory(&entries[0].1).unwrap();
    assert_eq!(img.dimensions(), (128, 64));
}
