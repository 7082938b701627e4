//! KML fragments.
//!
//! Each function renders one element from an explicit record.
//! Fragments are composed into documents by concatenation only.

use crate::LatLonBox;
use geo::geometry::LineString;
use quick_xml::escape::escape;
use std::fmt::Write;
use wrfout::{iso, TimeWindow, C};

/// One time step of a fire perimeter.
#[derive(Debug, Clone, Copy)]
pub struct PerimeterPlacemark<'a> {
    /// Timestamp shown in the placemark name.
    pub label: &'a str,

    /// Visibility window, omitted when empty.
    pub window: TimeWindow,

    pub rings: &'a [LineString<C>],
}

/// An image draped over the ground.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundOverlay {
    pub name: String,

    /// Image location relative to the document.
    pub href: String,

    /// Overlay opacity, 0 is invisible.
    pub alpha: u8,

    pub bounds: LatLonBox,

    /// Visibility window, `None` for a static overlay.
    pub window: Option<TimeWindow>,
}

/// An image pinned to the viewer's screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenOverlay {
    pub name: String,
    pub href: String,
}

/// Returns a `TimeSpan`, or an empty string for an empty window.
pub fn time_span(window: &TimeWindow) -> String {
    if window.is_empty() {
        return String::new();
    }
    let mut span = String::from("<TimeSpan>\n");
    if let Some(begin) = window.begin {
        let _ = writeln!(span, "  <begin>{}</begin>", iso(begin));
    }
    if let Some(end) = window.end {
        let _ = writeln!(span, "  <end>{}</end>", iso(end));
    }
    span.push_str("</TimeSpan>");
    span
}

/// Returns a ground-clamped `Polygon` whose outer boundary is `ring`.
pub fn polygon(ring: &LineString<C>) -> String {
    let coordinates = ring
        .coords()
        .map(|c| format!("{:.6},{:.6}", c.x, c.y))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "<Polygon>
  <tessellate>1</tessellate>
  <altitudeMode>clampToGround</altitudeMode>
  <outerBoundaryIs>
    <LinearRing>
      <coordinates>
{coordinates}
      </coordinates>
    </LinearRing>
  </outerBoundaryIs>
</Polygon>"
    )
}

/// Returns a `Placemark` holding every ring of one time step.
pub fn placemark(p: &PerimeterPlacemark<'_>) -> String {
    let polygons = p
        .rings
        .iter()
        .map(polygon)
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "<Placemark>
  <name>Fire perimeter at {label}</name>
  <styleUrl>#redLine</styleUrl>
  {time}
  <MultiGeometry>
{polygons}
  </MultiGeometry>
</Placemark>",
        label = escape(p.label),
        time = time_span(&p.window),
    )
}

/// Wraps placemarks in the perimeter document.
pub fn perimeter_document(content: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
<Document>
  <name>fire_perimeter.kml</name>
  <open>0</open>
  <Style id="redLine">
    <LineStyle>
      <color>ff0000ff</color>
      <width>3</width>
    </LineStyle>
    <PolyStyle>
      <color>ff0000ff</color>
      <fill>0</fill>
    </PolyStyle>
  </Style>
{content}
</Document>
</kml>
"#
    )
}

pub fn ground_overlay(o: &GroundOverlay) -> String {
    let LatLonBox {
        north,
        south,
        east,
        west,
    } = o.bounds;
    let time = o.window.as_ref().map(time_span).unwrap_or_default();
    format!(
        "<GroundOverlay>
  <name>{name}</name>
  <color>{alpha:02x}ffffff</color>
  <Icon>
    <href>{href}</href>
    <viewBoundScale>0.75</viewBoundScale>
  </Icon>
  <altitude>0.0</altitude>
  <altitudeMode>clampToGround</altitudeMode>
  <LatLonBox>
    <north>{north:.6}</north>
    <south>{south:.6}</south>
    <east>{east:.6}</east>
    <west>{west:.6}</west>
    <rotation>0.0</rotation>
  </LatLonBox>
  {time}
</GroundOverlay>",
        name = escape(&o.name),
        alpha = o.alpha,
        href = escape(&o.href),
    )
}

/// Returns a legend pinned to the left edge of the screen.
pub fn screen_overlay(o: &ScreenOverlay) -> String {
    format!(
        r#"<ScreenOverlay>
  <name>{name} colorbar</name>
  <color>ffffffff</color>
  <Icon>
    <href>{href}</href>
  </Icon>
  <overlayXY x=".15" y=".5" xunits="fraction" yunits="fraction"/>
  <screenXY x="0" y=".5" xunits="fraction" yunits="fraction"/>
  <rotationXY x="0" y="0" xunits="fraction" yunits="fraction"/>
  <size x="0" y=".75" xunits="fraction" yunits="fraction"/>
</ScreenOverlay>"#,
        name = escape(&o.name),
        href = escape(&o.href),
    )
}

/// Wraps overlays in a folder document for program `prog`.
pub fn folder_document(prog: &str, content: &str) -> String {
    let prog = escape(prog);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
<Folder>
  <name>{prog} visualization</name>
  <description>Variables from {prog} output files visualized in Google Earth</description>
{content}
</Folder>
</kml>
"#
    )
}
