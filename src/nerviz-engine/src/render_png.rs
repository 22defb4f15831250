// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Rasterize any SVG this crate produces (a force layout or a pair grid)
//! to PNG with resvg.  Text uses the fonts installed on the host.

use std::sync::Arc;

use resvg::tiny_skia;
use resvg::usvg;

use crate::common::{Error, ErrorCode, ErrorKind, Result};

fn render_failed(details: String) -> Error {
    Error::new(ErrorKind::Layout, ErrorCode::RenderFailed, Some(details))
}

/// Output size.  With neither dimension set the SVG's own size is used;
/// with one set the other follows the aspect ratio; `width` wins if both
/// are set.
#[derive(Clone, Copy, Default, Debug)]
pub struct PngRenderOpts {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl PngRenderOpts {
    fn pixel_size(&self, svg_w: f32, svg_h: f32) -> (u32, u32) {
        match (self.width, self.height) {
            (Some(w), _) => (w, (svg_h * w as f32 / svg_w).ceil() as u32),
            (None, Some(h)) => ((svg_w * h as f32 / svg_h).ceil() as u32, h),
            (None, None) => (svg_w.ceil() as u32, svg_h.ceil() as u32),
        }
    }
}

pub fn svg_to_png(svg: &str, opts: &PngRenderOpts) -> Result<Vec<u8>> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();

    let usvg_opts = usvg::Options {
        font_family: "sans-serif".to_owned(),
        fontdb: Arc::new(fontdb),
        ..usvg::Options::default()
    };

    let tree = usvg::Tree::from_str(svg, &usvg_opts)
        .map_err(|err| render_failed(format!("parsing SVG: {err}")))?;

    let size = tree.size();
    let (px_w, px_h) = opts.pixel_size(size.width(), size.height());
    if px_w == 0 || px_h == 0 {
        return Err(render_failed(format!("empty image ({px_w}x{px_h})")));
    }

    let mut pixmap = tiny_skia::Pixmap::new(px_w, px_h)
        .ok_or_else(|| render_failed(format!("allocating {px_w}x{px_h} pixmap")))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let transform = tiny_skia::Transform::from_scale(
        px_w as f32 / size.width(),
        px_h as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|err| render_failed(format!("encoding PNG: {err}")))
}
