use std::io::Cursor;

use hanoi_ngin::{Vector4, data_structures::texture::Texture};
use image::{ImageFormat, Rgba, RgbaImage};

fn checker() -> RgbaImage {
    RgbaImage::from_fn(2, 2, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

#[test]
fn sampling_is_nearest_with_repeat() {
    let texture = Texture::from_image("checker", checker());
    assert_eq!(texture.sample([0.1, 0.1]), Vector4::new(1.0, 1.0, 1.0, 1.0));
    assert_eq!(texture.sample([0.9, 0.1]), Vector4::new(0.0, 0.0, 0.0, 1.0));
    assert_eq!(texture.sample([1.1, 1.1]), texture.sample([0.1, 0.1]));
    assert_eq!(texture.sample([-0.1, 0.1]), texture.sample([0.9, 0.1]));
    assert_eq!(texture.sample([1.0, 1.0]), texture.sample([0.0, 0.0]));
}

#[test]
fn decodes_encoded_images() {
    let mut png = Vec::new();
    checker()
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();

    let texture = Texture::from_bytes(&png, "checker", Some("png")).unwrap();
    assert_eq!(texture.dimensions(), (2, 2));
    assert_eq!(texture.object().name(), "checker");

    assert!(Texture::from_bytes(&png, "checker", None).is_ok());
    assert!(Texture::from_bytes(&png, "checker", Some("nope")).is_err());
    assert!(Texture::from_bytes(b"garbage", "broken", None).is_err());
}
