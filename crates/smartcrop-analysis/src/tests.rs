//! Pipeline-level tests for crop selection.

use crate::{find_best_crop, Analyzer, BoostRegion, CropError, CropRect, Image, Settings};

/// Gray background with a warm skin-toned disc, a striped patch and a
/// saturated blue square, so every detector has something to find.
fn scene(width: u32, height: u32) -> Image {
    let (cx, cy) = (width as f64 * 0.7, height as f64 * 0.4);
    let radius = width.min(height) as f64 * 0.15;

    Image::from_fn(width, height, |x, y| {
        let (xf, yf) = (x as f64, y as f64);
        if ((xf - cx).powi(2) + (yf - cy).powi(2)).sqrt() < radius {
            [199, 145, 112, 255]
        } else if x < width / 4 && y > height / 2 && (x / 3) % 2 == 0 {
            [30, 30, 30, 255]
        } else if x > width / 3 && x < width / 2 && y > height * 2 / 3 {
            [30, 60, 220, 255]
        } else {
            [128, 128, 128, 255]
        }
    })
}

/// Uniform gray with a saturated red block; `unit` scales the geometry.
fn red_block(unit: u32) -> Image {
    Image::from_fn(256 * unit, 128 * unit, |x, y| {
        if (160 * unit..192 * unit).contains(&x) && (48 * unit..80 * unit).contains(&y) {
            [220, 40, 40, 255]
        } else {
            [128, 128, 128, 255]
        }
    })
}

fn no_downsampling() -> Settings {
    Settings {
        max_working_dimension: 1024,
        ..Default::default()
    }
}

#[test]
fn test_determinism() {
    let image = scene(480, 320);
    let analyzer = Analyzer::default();

    let first = analyzer.analyze(&image, 200, 150).unwrap();
    let second = analyzer.analyze(&image, 200, 150).unwrap();

    assert_eq!(first.crop.rect, second.crop.rect);
    assert_eq!(
        first.crop.score.total.to_bits(),
        second.crop.score.total.to_bits()
    );
    assert_eq!(
        find_best_crop(&image, 200, 150, None).unwrap(),
        first.crop.rect
    );
}

#[test]
fn test_aspect_fidelity() {
    let image = scene(640, 480);
    let analyzer = Analyzer::default();

    for (tw, th) in [(16, 9), (9, 16), (4, 3), (3, 2), (1, 1), (250, 100)] {
        let analysis = analyzer.analyze(&image, tw, th).unwrap();
        let rect = analysis.crop.rect;

        // One working pixel in original pixels, plus rounding
        let tolerance = 1.0 / analysis.scale + 1.0;
        let expected_height = rect.width as f64 * th as f64 / tw as f64;
        assert!(
            (rect.height as f64 - expected_height).abs() <= tolerance,
            "{}:{} gave {:?}",
            tw,
            th,
            rect
        );
    }
}

#[test]
fn test_containment() {
    for (w, h) in [(1000, 333), (333, 1000), (401, 399), (7, 5), (1, 1), (4000, 3)] {
        let image = scene(w, h);
        for (tw, th) in [(1, 1), (16, 9), (2, 3)] {
            match find_best_crop(&image, tw, th, None) {
                Ok(rect) => {
                    assert!(!rect.is_empty(), "{}x{} {}:{} gave {:?}", w, h, tw, th, rect);
                    assert!(rect.fits_within(w, h), "{}x{} {}:{} gave {:?}", w, h, tw, th, rect);
                }
                Err(CropError::ImageTooSmall { .. }) => {}
                Err(e) => panic!("{}x{} {}:{} failed: {}", w, h, tw, th, e),
            }
        }
    }
}

#[test]
fn test_zero_target_fails_before_reading_pixels() {
    // Buffer is empty: any pixel access would panic
    let image = Image::from_raw(10, 10, Vec::new());

    assert!(matches!(
        find_best_crop(&image, 0, 100, None),
        Err(CropError::InvalidTargetSize {
            width: 0,
            height: 100
        })
    ));
    assert!(matches!(
        find_best_crop(&image, 100, 0, None),
        Err(CropError::InvalidTargetSize { .. })
    ));
    assert!(matches!(
        find_best_crop(&image, 100, 100, None),
        Err(CropError::UnsupportedImage(_))
    ));
}

#[test]
fn test_image_too_small() {
    let image = Image::filled(100, 1, [128, 128, 128, 255]);
    let result = find_best_crop(&image, 1, 100, None);

    assert!(matches!(result, Err(CropError::ImageTooSmall { .. })));
}

#[test]
fn test_boost_pulls_winner_and_raises_score() {
    let image = Image::filled(512, 256, [128, 128, 128, 255]);
    let settings = no_downsampling();
    let boost = BoostRegion::new(CropRect::new(320, 96, 80, 64), 1.0);

    let plain = Analyzer::new(settings.clone()).analyze(&image, 1, 1).unwrap();
    let boosted = Analyzer::new(settings)
        .with_boost(boost)
        .analyze(&image, 1, 1)
        .unwrap();

    // Flat image: nothing to prefer, the first candidate wins
    assert_eq!(plain.crop.rect, CropRect::new(0, 0, 256, 256));
    assert_eq!(plain.crop.score.total, 0.0);

    // The first grid offset that contains the boost
    assert_eq!(boosted.crop.rect, CropRect::new(144, 0, 256, 256));
    assert!(boosted.crop.rect.contains(&boost.rect));
    assert!(boosted.crop.score.total > plain.crop.score.total);
    assert!(boosted.crop.score.boost > 0.0);
}

#[test]
fn test_half_resolution_gives_nearby_crop() {
    let settings = no_downsampling();
    let full = find_best_crop(&red_block(2), 64, 64, Some(&settings)).unwrap();
    let half = find_best_crop(&red_block(1), 64, 64, Some(&settings)).unwrap();

    let tolerance = 16;
    assert!(full.x.abs_diff(half.x * 2) <= tolerance, "{:?} vs {:?}", full, half);
    assert!(full.y.abs_diff(half.y * 2) <= tolerance, "{:?} vs {:?}", full, half);
    assert!(full.width.abs_diff(half.width * 2) <= tolerance);

    // Both keep the salient block
    assert!(full.contains(&CropRect::new(320, 96, 64, 64)));
    assert!(half.contains(&CropRect::new(160, 48, 32, 32)));
}

#[test]
fn test_working_resolution_barely_moves_crop() {
    // Default settings shrink 512x256 to 400x200
    let image = red_block(2);
    let native = find_best_crop(&image, 1, 1, Some(&no_downsampling())).unwrap();
    let downsampled = find_best_crop(&image, 1, 1, None).unwrap();

    assert_eq!(native.width, 256);
    assert_eq!(downsampled.width, 256);
    assert!(native.x.abs_diff(downsampled.x) <= 8, "{:?} vs {:?}", native, downsampled);
}

/// 640x427 gray frame with a bright green band over columns 60..=486.
///
/// Area-averaged to 400x267, the band covers working columns 37..=303
/// exactly: the only 267-wide window holding all of its importance starts at
/// working x = 37, which maps back to original x = 59.
fn banded_640x427() -> Image {
    Image::from_fn(640, 427, |x, _| {
        if (60..=486).contains(&x) {
            [40, 200, 80, 255]
        } else {
            [128, 128, 128, 255]
        }
    })
}

#[test]
fn test_golden_square_crop() {
    let image = banded_640x427();
    let analysis = Analyzer::default().analyze(&image, 250, 250).unwrap();

    assert_eq!(analysis.scale, 0.625);
    assert_eq!(analysis.working_crop, CropRect::new(37, 0, 267, 267));
    assert_eq!(analysis.crop.rect, CropRect::from_corners((59, 0), (486, 427)));
    assert_eq!(analysis.crop.rect.to_string(), "(59,0)-(486,427)");
}

#[test]
fn test_refined_grid_matches_exhaustive_search() {
    let image = banded_640x427();
    let exhaustive = Settings {
        candidate_step_size: 1,
        ..Default::default()
    };

    let refined = find_best_crop(&image, 250, 250, None).unwrap();
    let full = find_best_crop(&image, 250, 250, Some(&exhaustive)).unwrap();
    assert_eq!(refined, full);
}

#[tokio::test]
async fn test_find_best_crop_async() {
    let image = scene(320, 240);
    let analyzer = Analyzer::default();

    let sync = analyzer.find_best_crop(&image, 1, 1).unwrap();
    let async_rect = analyzer.find_best_crop_async(image, 1, 1).await.unwrap();

    assert_eq!(sync, async_rect);
}

#[tokio::test]
async fn test_async_cancellation() {
    let (tx, rx) = tokio::sync::watch::channel(false);
    let analyzer = Analyzer::default().with_cancel(rx);
    tx.send(true).unwrap();

    let result = analyzer.find_best_crop_async(scene(320, 240), 1, 1).await;
    assert!(matches!(result, Err(CropError::Cancelled)));
}
