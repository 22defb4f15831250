// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::layout::scene::{Scene, SceneEdge, SceneNode};
use crate::layout::config::ForceConfig;
use crate::svg::{class_list, escape_xml_attr, escape_xml_text, format_number};

const RENDER_STYLES: &str = r#"
.nerviz-graph text {
  fill: #000000;
  font-size: 14px;
  font-family: "Open Sans", "Arial", sans-serif;
  user-select: none;
}

.nerviz-graph .edge-wrap line {
  stroke: #000000;
  stroke-width: 2px;
}

.nerviz-graph .edge-label-box {
  fill: #ffffff;
}

.nerviz-graph .edge-label {
  font-size: 12px;
  fill: #555555;
}

.nerviz-graph .node-box {
  fill: #ffffff;
  stroke: #000000;
  stroke-width: 1px;
  opacity: 0;
}

.nerviz-graph .node-wrap {
  cursor: grab;
}

.nerviz-graph .node-wrap.highlighted .node-box {
  opacity: 1;
  stroke-dasharray: 4 3;
}

.nerviz-graph .faded {
  opacity: 0.2;
}

.nerviz-graph marker path {
  fill: none;
  stroke: #000000;
  stroke-linecap: round;
  stroke-linejoin: round;
}
"#;

fn render_marker(svg: &mut String, marker_id: &str) {
    svg.push_str(&format!(
        "<marker id=\"{}\" viewBox=\"0 0 5 5\" markerWidth=\"5\" markerHeight=\"5\" markerUnits=\"strokeWidth\" refX=\"4\" refY=\"2.5\" orient=\"auto-start-reverse\">",
        escape_xml_attr(marker_id)
    ));
    svg.push_str("<path d=\"M 1,1 L 4,2.5 L 1,4\"></path>");
    svg.push_str("</marker>");
}

fn render_edge(svg: &mut String, edge: &SceneEdge, marker_id: &str, config: &ForceConfig) {
    let class = class_list(&[("edge-wrap", true), ("faded", edge.is_faded)]);
    svg.push_str(&format!("<g class=\"{class}\">"));

    // edges whose endpoints overlap have nothing to draw yet
    if let Some(segment) = edge.segment {
        let marker = if edge.is_directed {
            format!(" marker-end=\"url(#{})\"", escape_xml_attr(marker_id))
        } else {
            String::new()
        };
        svg.push_str(&format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{marker}></line>",
            format_number(segment.start.x),
            format_number(segment.start.y),
            format_number(segment.end.x),
            format_number(segment.end.y),
        ));

        if let Some(label) = edge.label.as_deref().filter(|l| !l.is_empty()) {
            let mid = segment.midpoint();
            let width = config.edge_label_width(Some(label));
            let height = config.edge_label_height;
            svg.push_str(&format!(
                "<rect class=\"edge-label-box\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"></rect>",
                format_number(mid.x - width / 2.0),
                format_number(mid.y - height / 2.0),
                format_number(width),
                format_number(height),
            ));
            svg.push_str(&format!(
                "<text class=\"edge-label\" x=\"{}\" y=\"{}\" dominant-baseline=\"middle\" text-anchor=\"middle\">{}</text>",
                format_number(mid.x),
                format_number(mid.y + 1.0),
                escape_xml_text(label),
            ));
        }
    }

    svg.push_str("</g>");
}

fn render_node(svg: &mut String, node: &SceneNode) {
    let class = class_list(&[
        ("node-wrap", true),
        ("faded", node.is_faded),
        ("highlighted", node.is_highlighted),
    ]);
    let transform = format!(
        "translate({} {})",
        format_number(node.x.unwrap_or(0.0)),
        format_number(node.y.unwrap_or(0.0))
    );

    svg.push_str(&format!("<g class=\"{class}\" id=\"node-{}\">", node.id));
    svg.push_str(&format!(
        "<rect class=\"node-box\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" transform=\"{transform}\"></rect>",
        format_number(-node.width / 2.0),
        format_number(-node.height / 2.0),
        format_number(node.width),
        format_number(node.height),
        format_number(node.height / 2.0),
    ));
    svg.push_str(&format!(
        "<text text-anchor=\"middle\" dominant-baseline=\"central\" transform=\"{transform}\">{}</text>",
        escape_xml_text(&node.label)
    ));
    svg.push_str("</g>");
}

/// Serialize the current scene as a standalone SVG document.  The view box
/// is centered on the origin, edges are drawn beneath nodes.
pub fn render_scene(scene: &Scene, config: &ForceConfig) -> String {
    let [min_x, min_y, width, height] = scene.view_box();

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"nerviz-graph\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\" aria-label=\"{}\">",
        format_number(width),
        format_number(height),
        format_number(min_x),
        format_number(min_y),
        format_number(width),
        format_number(height),
        escape_xml_attr(&scene.title),
    ));
    svg.push_str("<style>\n");
    svg.push_str(RENDER_STYLES);
    svg.push_str("\n</style>\n");
    svg.push_str("<defs>");
    render_marker(&mut svg, &scene.marker_id);
    svg.push_str("</defs>");

    svg.push_str("<g class=\"edges\">");
    for edge in &scene.edges {
        render_edge(&mut svg, edge, &scene.marker_id, config);
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"nodes\">");
    for node in &scene.nodes {
        render_node(&mut svg, node);
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}
