// src/map/leaflet.rs
use crate::{
    errors::TawsilResult,
    map::{state::MapState, MapMessage, MapSurface, Viewport},
    models::tracking::LatLng,
};

const LEAFLET_VERSION: &str = "1.9.4";
const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Renders a [`MapState`] as a self-contained Leaflet page and turns
/// updates into scripts a web view can evaluate.
pub struct LeafletSurface {
    state: MapState,
    scripts: Vec<String>,
}

impl LeafletSurface {
    pub fn new(state: MapState) -> Self {
        Self { state, scripts: Vec::new() }
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    /// Scripts produced since the last call
    pub fn drain_scripts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.scripts)
    }

    pub fn html(&self) -> String {
        let driver = self.state.driver.position;
        let mut body = String::new();

        body.push_str(&format!(
            "var map = L.map('map', {{zoomControl: false}});\n\
             L.tileLayer('{}', {{maxZoom: 19}}).addTo(map);\n\
             var driverMarker = L.marker([{}, {}]).addTo(map).bindPopup({});\n",
            TILE_URL,
            driver.lat,
            driver.lng,
            js_string(&self.state.driver.label),
        ));

        match &self.state.restaurant {
            Some(restaurant) => body.push_str(&format!(
                "L.marker([{}, {}]).addTo(map).bindPopup({});\n\
                 var route = L.polyline([[{}, {}], [{}, {}]], {{dashArray: '8 8', weight: 3}}).addTo(map);\n",
                restaurant.position.lat,
                restaurant.position.lng,
                js_string(&restaurant.label),
                restaurant.position.lat,
                restaurant.position.lng,
                driver.lat,
                driver.lng,
            )),
            None => body.push_str("var route = null;\n"),
        }

        body.push_str(&viewport_script(&self.state.initial_view));
        if self.state.viewport != self.state.initial_view {
            body.push_str(&viewport_script(&self.state.viewport));
        }
        body.push_str(
            "window.updateDriverLocation = function (lat, lng) {\n\
             \x20 driverMarker.setLatLng([lat, lng]);\n\
             \x20 if (route) { var pts = route.getLatLngs(); route.setLatLngs([pts[0], [lat, lng]]); }\n\
             \x20 map.panTo([lat, lng], {animate: true, duration: 1});\n\
             };\n\
             function onMessage(event) {\n\
             \x20 try {\n\
             \x20   var msg = typeof event.data === 'string' ? JSON.parse(event.data) : event.data;\n\
             \x20   if (msg && msg.type === 'update') { window.updateDriverLocation(msg.lat, msg.lng); }\n\
             \x20 } catch (e) {}\n\
             }\n\
             window.addEventListener('message', onMessage);\n\
             document.addEventListener('message', onMessage);\n",
        );

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
             <link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@{v}/dist/leaflet.css\" />\n\
             <script src=\"https://unpkg.com/leaflet@{v}/dist/leaflet.js\"></script>\n\
             <style>html, body, #map {{ height: 100%; margin: 0; }}</style>\n\
             </head>\n<body>\n<div id=\"map\"></div>\n<script>\n{body}</script>\n</body>\n</html>\n",
            v = LEAFLET_VERSION,
            body = body,
        )
    }
}

impl MapSurface for LeafletSurface {
    fn apply(&mut self, message: &MapMessage) -> TawsilResult<()> {
        self.state.apply(message)?;
        let LatLng { lat, lng } = self.state.driver.position;
        self.scripts.push(format!("window.updateDriverLocation({}, {});", lat, lng));
        Ok(())
    }
}

fn viewport_script(viewport: &Viewport) -> String {
    match viewport {
        Viewport::Centered { center, zoom } => {
            format!("map.setView([{}, {}], {});\n", center.lat, center.lng, zoom)
        }
        Viewport::FitBounds { south_west, north_east, padding_px } => format!(
            "map.fitBounds([[{}, {}], [{}, {}]], {{padding: [{p}, {p}]}});\n",
            south_west.lat,
            south_west.lng,
            north_east.lat,
            north_east.lng,
            p = padding_px,
        ),
        Viewport::PanTo { center, animation } => format!(
            "map.panTo([{}, {}], {{animate: true, duration: {}}});\n",
            center.lat,
            center.lng,
            animation.as_secs_f64(),
        ),
    }
}

/// JSON string literals are valid JS; `</` is broken up so a label cannot close the script tag
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}
