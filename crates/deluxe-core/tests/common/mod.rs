#![allow(dead_code)]

use deluxe_core::frame::{ColorFrame, Frame, Image};
use deluxe_core::graph::{Edge, NodeId};
use deluxe_core::meta::sharpen::{SharpenDeluxe, Technique};
use deluxe_core::meta::MetaNode;
use ndarray::Array2;

pub fn make_frame(h: usize, w: usize, fill: f32) -> Frame {
    Frame::new(Array2::from_elem((h, w), fill), 8)
}

pub fn make_mono(h: usize, w: usize, fill: f32) -> Image {
    Image::Mono(make_frame(h, w, fill))
}

pub fn make_color(h: usize, w: usize, r: f32, g: f32, b: f32) -> Image {
    Image::Color(ColorFrame {
        red: make_frame(h, w, r),
        green: make_frame(h, w, g),
        blue: make_frame(h, w, b),
    })
}

/// Diagonal ramp in [0, 1).
pub fn make_ramp(h: usize, w: usize) -> Image {
    let data = Array2::from_shape_fn((h, w), |(row, col)| {
        (row * w + col) as f32 / (h * w) as f32
    });
    Image::Mono(Frame::new(data, 8))
}

/// Dark field with a bright centred square.
pub fn make_square(h: usize, w: usize) -> Image {
    let data = Array2::from_shape_fn((h, w), |(row, col)| {
        let inside = (h / 4..3 * h / 4).contains(&row) && (w / 4..3 * w / 4).contains(&col);
        if inside {
            0.8
        } else {
            0.2
        }
    });
    Image::Mono(Frame::new(data, 8))
}

pub fn attached_sharpen() -> MetaNode<SharpenDeluxe> {
    MetaNode::attached(SharpenDeluxe::new()).unwrap()
}

pub fn technique_node(node: &MetaNode<SharpenDeluxe>, technique: Technique) -> NodeId {
    node.operation().techniques().unwrap()[technique]
}

pub fn blend_node(node: &MetaNode<SharpenDeluxe>) -> NodeId {
    node.operation().blend().unwrap()
}

/// The exact edge set expected while `technique` is selected.
pub fn expected_edges(node: &MetaNode<SharpenDeluxe>, technique: Technique) -> Vec<Edge> {
    let blend = blend_node(node);
    let active = technique_node(node, technique);
    let mut edges = vec![
        Edge {
            source: node.input(),
            sink: blend,
            sink_pad: "input",
        },
        Edge {
            source: active,
            sink: blend,
            sink_pad: "aux",
        },
        Edge {
            source: node.input(),
            sink: active,
            sink_pad: "input",
        },
        Edge {
            source: blend,
            sink: node.output(),
            sink_pad: "input",
        },
    ];
    edges.sort_by_key(|e| (e.sink, e.sink_pad));
    edges
}

pub fn max_abs_diff(a: &Image, b: &Image) -> f32 {
    a.channels()
        .into_iter()
        .zip(b.channels())
        .flat_map(|(x, y)| x.iter().zip(y.iter()).map(|(p, q)| (p - q).abs()).collect::<Vec<_>>())
        .fold(0.0, f32::max)
}
