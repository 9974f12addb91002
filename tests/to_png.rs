#![allow(missing_docs, reason = "integration tests")]
//! Preview rendering.

use std::fs::File;
use std::io::BufReader;

use png::{ColorType, Decoder};
use wled_matrix::colors;
use wled_matrix::matrix::{HEIGHT, MatrixFrame, WIDTH};
use wled_matrix::to_png::{PreviewGeometry, write_frame_png};

#[test]
fn preview_fits_and_draws_lit_leds() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output_path = dir.path().join("nested").join("preview.png");
    let mut frame = MatrixFrame::new();
    frame[(0, 0)] = colors::RED;
    frame[(63, 15)] = colors::BLUE;

    let geometry = write_frame_png(&frame, &output_path, 640).expect("write preview");
    assert!(geometry.width <= 640 && geometry.height <= 640);
    assert!(geometry.width > geometry.height);

    let decoder = Decoder::new(BufReader::new(File::open(&output_path).expect("open preview")));
    let mut reader = decoder.read_info().expect("read preview header");
    let mut buffer = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buffer).expect("decode preview");
    assert_eq!((info.width, info.height), (geometry.width, geometry.height));
    assert_eq!(info.color_type, ColorType::Rgb);

    let rgb_at = |(x, y): (u32, u32)| {
        let offset = (y as usize * info.line_size) + x as usize * 3;
        (buffer[offset], buffer[offset + 1], buffer[offset + 2])
    };
    assert_eq!(rgb_at(geometry.led_center(0, 0)), (255, 0, 0));
    assert_eq!(rgb_at(geometry.led_center(63, 15)), (0, 0, 255));
    assert_eq!(rgb_at(geometry.led_center(1, 0)), (0, 0, 0));
    assert_eq!(rgb_at((0, 0)), (0, 0, 0), "border stays black");
}

#[test]
fn geometry_shrinks_cells_to_fit() {
    let geometry = PreviewGeometry::fit(WIDTH as u32, HEIGHT as u32, 200);
    assert!(geometry.width <= 200);
    let larger = PreviewGeometry::fit(WIDTH as u32, HEIGHT as u32, 400);
    assert!(larger.cell_size > geometry.cell_size);
}

#[test]
fn geometry_bottoms_out_at_two_pixel_cells() {
    let geometry = PreviewGeometry::fit(WIDTH as u32, HEIGHT as u32, 100);
    assert_eq!(geometry.cell_size, 2);
    assert_eq!(geometry.led_radius, 1);
    assert_eq!((geometry.width, geometry.height), (130, 34));
    assert!(geometry.width > 100, "smallest cells still overflow a tiny target");
}
