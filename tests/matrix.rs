#![allow(missing_docs, reason = "integration tests")]
//! Driver behaviour against a recording transport.

use std::cell::{Cell, RefCell};

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, PrimitiveStyle},
};
use serde_json::{Value, json};
use wled_matrix::matrix::{MatrixFrame, layout::xy_to_index};
use wled_matrix::transport::Transport;
use wled_matrix::{Error, RGB8, Result, WledMatrix};

/// Records every body and answers with a fixed status.
struct Recorder {
    bodies: RefCell<Vec<Vec<u8>>>,
    status: Cell<u16>,
    fail: Cell<bool>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            bodies: RefCell::new(Vec::new()),
            status: Cell::new(200),
            fail: Cell::new(false),
        }
    }

    fn bodies(&self) -> Vec<Vec<u8>> {
        self.bodies.borrow().clone()
    }

    fn last_json(&self) -> Value {
        let bodies = self.bodies.borrow();
        let body = bodies.last().expect("a request was sent");
        serde_json::from_slice(body).expect("body is JSON")
    }
}

impl Transport for Recorder {
    fn post_json(&self, body: &[u8]) -> Result<u16> {
        self.bodies.borrow_mut().push(body.to_vec());
        if self.fail.get() {
            // Any failure to get an answer.
            let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
            return Err(Error::Io(io));
        }
        Ok(self.status.get())
    }
}

fn pairs(message: &Value) -> Vec<(u64, String)> {
    let list = message["seg"][0]["i"].as_array().expect("i is an array");
    list.chunks(2)
        .map(|pair| {
            (
                pair[0].as_u64().expect("index is an integer"),
                pair[1].as_str().expect("color is a string").to_owned(),
            )
        })
        .collect()
}

#[test]
fn corner_scenario_sends_four_mapped_pixels() {
    let recorder = Recorder::new();
    let mut matrix = WledMatrix::with_transport(&recorder);
    matrix.set_pixel(0, 0, 255, 0, 0);
    matrix.set_pixel(63, 0, 0, 255, 0);
    matrix.set_pixel(0, 15, 0, 0, 255);
    matrix.set_pixel(63, 15, 255, 255, 0);

    assert!(matrix.show());

    let message = recorder.last_json();
    assert_eq!(message["on"], json!(true));
    assert_eq!(message["seg"][0]["id"], json!(0));
    let mut sent = pairs(&message);
    sent.sort();
    let mut expected = vec![
        (u64::from(xy_to_index(0, 0)), "FF0000".to_owned()),
        (u64::from(xy_to_index(63, 0)), "00FF00".to_owned()),
        (u64::from(xy_to_index(0, 15)), "0000FF".to_owned()),
        (u64::from(xy_to_index(63, 15)), "FFFF00".to_owned()),
    ];
    expected.sort();
    assert_eq!(sent, expected);
    assert_eq!(
        sent.iter().map(|(index, _)| *index).collect::<Vec<_>>(),
        [248, 263, 760, 775]
    );
}

#[test]
fn black_frame_sends_empty_list_with_power_on() {
    let recorder = Recorder::new();
    let mut matrix = WledMatrix::with_transport(&recorder);
    matrix.set_pixel(4, 4, 9, 9, 9);
    matrix.clear(false);
    assert!(recorder.bodies().is_empty(), "clear(false) must not send");

    assert!(matrix.show());
    assert_eq!(
        recorder.last_json(),
        json!({"on": true, "seg": [{"id": 0, "i": []}]})
    );
}

#[test]
fn clear_with_send_powers_off() {
    let recorder = Recorder::new();
    let mut matrix = WledMatrix::with_transport(&recorder);
    matrix.set_pixel(1, 1, 1, 2, 3);

    assert!(matrix.clear(true));
    assert_eq!(recorder.bodies(), [br#"{"on":false}"#.to_vec()]);
    assert_eq!(matrix.frame(), &MatrixFrame::new());
}

#[test]
fn repeated_show_sends_identical_bytes() {
    let recorder = Recorder::new();
    let mut matrix = WledMatrix::with_transport(&recorder);
    matrix.set_pixel(10, 3, 0x12, 0x34, 0x56);
    matrix.set_pixel(10, 3, 0x12, 0x34, 0x56);
    matrix.set_pixel(40, 12, 1, 0, 0);

    assert!(matrix.show());
    assert!(matrix.show());

    let bodies = recorder.bodies();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(pairs(&recorder.last_json()).len(), 2);
}

#[test]
fn out_of_range_writes_are_ignored() {
    let recorder = Recorder::new();
    let mut matrix = WledMatrix::with_transport(&recorder);
    matrix.set_pixel(-1, 0, 255, 255, 255);
    matrix.set_pixel(64, 0, 255, 255, 255);
    matrix.set_pixel(0, -1, 255, 255, 255);
    matrix.set_pixel(0, 16, 255, 255, 255);
    matrix.set_pixel(i32::MIN, i32::MAX, 255, 255, 255);

    assert_eq!(matrix.frame(), &MatrixFrame::new());
    assert!(matrix.update_list().is_empty());
}

#[test]
fn try_set_pixel_reports_and_leaves_frame_alone() {
    let mut matrix = WledMatrix::with_transport(Recorder::new());
    let result = matrix.try_set_pixel(-1, 0, RGB8::new(1, 1, 1));
    assert!(matches!(result, Err(Error::PixelOutOfBounds { x: -1, y: 0 })));
    assert_eq!(matrix.frame(), &MatrixFrame::new());

    matrix
        .try_set_pixel(63, 15, RGB8::new(1, 1, 1))
        .expect("in-range write succeeds");
    assert_eq!(matrix.frame().get(63, 15), Some(RGB8::new(1, 1, 1)));
}

#[test]
fn non_200_answer_is_failure() {
    let recorder = Recorder::new();
    recorder.status.set(500);
    let mut matrix = WledMatrix::with_transport(&recorder);
    matrix.set_pixel(0, 0, 1, 1, 1);

    assert!(!matrix.show());
    assert!(matches!(matrix.try_show(), Err(Error::HttpStatus(500))));

    recorder.status.set(204);
    assert!(!matrix.show(), "only 200 counts as success");
}

#[test]
fn transport_error_is_reported_not_raised() {
    let recorder = Recorder::new();
    recorder.fail.set(true);
    let mut matrix = WledMatrix::with_transport(&recorder);
    matrix.set_pixel(0, 0, 1, 1, 1);

    assert!(!matrix.show());
    assert!(!matrix.clear(true));
    assert_eq!(
        matrix.frame(),
        &MatrixFrame::new(),
        "frame is cleared even when power-off fails"
    );
}

#[test]
fn update_list_is_row_major() {
    let mut matrix = WledMatrix::with_transport(Recorder::new());
    matrix.set_pixel(5, 1, 0, 0, 1);
    matrix.set_pixel(2, 0, 0, 0, 2);
    matrix.set_pixel(1, 1, 0, 0, 3);

    let blues: Vec<u8> = matrix.update_list().iter().map(|(_, color)| color.b).collect();
    assert_eq!(blues, [2, 3, 1]);
}

#[test]
fn drawing_goes_through_the_same_mapping() {
    let recorder = Recorder::new();
    let mut matrix = WledMatrix::with_transport(&recorder);
    Line::new(Point::new(0, 8), Point::new(70, 8))
        .into_styled(PrimitiveStyle::with_stroke(Rgb888::new(0, 0, 0x80), 1))
        .draw(&mut matrix)
        .expect("drawing into the matrix cannot fail");

    let updates = matrix.update_list();
    assert_eq!(updates.len(), 64, "pixels past the right edge are clipped");
    let expected: Vec<u16> = (0..64).map(|x| xy_to_index(x, 8)).collect();
    let sent: Vec<u16> = updates.iter().map(|(index, _)| *index).collect();
    assert_eq!(sent, expected);
}
