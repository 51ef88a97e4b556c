use crate::engine::assets::radar_sample::RadarSample;
use bevy::math::DVec3;
use bevy::render::render_resource::{
    PrimitiveTopology, VertexBufferLayout, VertexFormat, VertexStepMode,
};
use bytemuck::{Pod, Zeroable};

/// Packed ribbon vertex. Matches shader locations 0 (position), 1 (texcoord)
/// and 2 (local time).
#[repr(C)]
#[derive(Pod, Zeroable, Copy, Clone, Debug, PartialEq)]
pub struct RibbonVertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
    pub local_time: f32,
}

impl RibbonVertex {
    pub fn buffer_layout() -> VertexBufferLayout {
        VertexBufferLayout::from_vertex_formats(
            VertexStepMode::Vertex,
            [
                VertexFormat::Float32x3,
                VertexFormat::Float32x2,
                VertexFormat::Float32,
            ],
        )
    }
}

/// CPU side ribbon for one profile, drawn as a triangle strip of
/// `2 * sample_count` vertices ordered outer, inner, outer, inner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RibbonGeometry {
    vertices: Vec<RibbonVertex>,
}

impl RibbonGeometry {
    pub const TOPOLOGY: PrimitiveTopology = PrimitiveTopology::TriangleStrip;

    /// Build the ribbon. `start_time` is the simulation time mapped to local time zero.
    pub fn from_samples(samples: &[RadarSample], start_time: f64) -> Self {
        let count = samples.len();
        // A single sample has no extent along the track; pin it to u = 0.
        let u_step = if count > 1 {
            1.0 / (count - 1) as f64
        } else {
            0.0
        };

        let mut vertices = Vec::with_capacity(count * 2);
        for (i, sample) in samples.iter().enumerate() {
            let direction = surface_direction(sample.longitude_deg, sample.latitude_deg);
            let position = direction.as_vec3().to_array();
            let u = (i as f64 * u_step) as f32;
            let local_time = (sample.sim_time - start_time) as f32;

            vertices.push(RibbonVertex {
                position,
                texcoord: [u, 1.0],
                local_time,
            });
            vertices.push(RibbonVertex {
                position,
                texcoord: [u, 0.0],
                local_time,
            });
        }

        Self { vertices }
    }

    pub fn vertices(&self) -> &[RibbonVertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Unit direction for a geodetic longitude/latitude in degrees, in the body
/// fixed frame with +Y through the north pole and +Z through (0, 0).
pub fn surface_direction(longitude_deg: f64, latitude_deg: f64) -> DVec3 {
    let (lon, lat) = (longitude_deg.to_radians(), latitude_deg.to_radians());
    DVec3::new(lon.sin() * lat.cos(), lat.sin(), lon.cos() * lat.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::radar_sample::UtcTimestamp;

    fn sample(i: usize, lat: f64, lon: f64) -> RadarSample {
        RadarSample {
            record_number: i as i64,
            timestamp: UtcTimestamp {
                year: 2008,
                month: 1,
                day: 1,
                hour: 0,
                minute: 0,
                second: i as u8,
                nanos: 0,
            },
            sim_time: 1000.0 + i as f64 * 0.5,
            latitude_deg: lat,
            longitude_deg: lon,
            surface_altitude: 0.0,
            instrument_altitude: 0.0,
            aux: [0.0; 4],
        }
    }

    fn track(n: usize) -> Vec<RadarSample> {
        (0..n)
            .map(|i| sample(i, -30.0 + i as f64, 10.0 + i as f64 * 0.25))
            .collect()
    }

    #[test]
    fn two_vertices_per_sample_spanning_u() {
        let samples = track(5);
        let ribbon = RibbonGeometry::from_samples(&samples, samples[0].sim_time);
        assert_eq!(ribbon.vertex_count(), 10);

        let us: Vec<f32> = ribbon.vertices().iter().step_by(2).map(|v| v.texcoord[0]).collect();
        assert_eq!(us, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn pairs_share_direction_and_time_and_alternate_v() {
        let samples = track(4);
        let ribbon = RibbonGeometry::from_samples(&samples, samples[0].sim_time);
        for pair in ribbon.vertices().chunks(2) {
            assert_eq!(pair[0].position, pair[1].position);
            assert_eq!(pair[0].local_time, pair[1].local_time);
            assert_eq!(pair[0].texcoord[0], pair[1].texcoord[0]);
            assert_eq!(pair[0].texcoord[1], 1.0);
            assert_eq!(pair[1].texcoord[1], 0.0);
        }
    }

    #[test]
    fn local_time_is_relative_to_start_and_non_decreasing() {
        let samples = track(6);
        let ribbon = RibbonGeometry::from_samples(&samples, samples[0].sim_time);
        let times: Vec<f32> = ribbon.vertices().iter().map(|v| v.local_time).collect();
        assert_eq!(times[0], 0.0);
        assert_eq!(times[11], 2.5);
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn degenerate_inputs_are_harmless() {
        assert!(RibbonGeometry::from_samples(&[], 0.0).is_empty());

        let single = vec![sample(0, 0.0, 0.0)];
        let ribbon = RibbonGeometry::from_samples(&single, single[0].sim_time);
        assert_eq!(ribbon.vertex_count(), 2);
        assert!(ribbon.vertices().iter().all(|v| v.texcoord[0] == 0.0));
    }

    #[test]
    fn rebuilding_is_bit_identical() {
        let samples = track(32);
        let a = RibbonGeometry::from_samples(&samples, samples[0].sim_time);
        let b = RibbonGeometry::from_samples(&samples, samples[0].sim_time);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn directions_follow_body_fixed_axes() {
        let close = |a: DVec3, b: DVec3| (a - b).length() < 1e-12;
        assert!(close(surface_direction(0.0, 0.0), DVec3::Z));
        assert!(close(surface_direction(90.0, 0.0), DVec3::X));
        assert!(close(surface_direction(0.0, 90.0), DVec3::Y));
        assert!((surface_direction(137.0, -42.0).length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn vertex_stride_matches_layout() {
        assert_eq!(std::mem::size_of::<RibbonVertex>(), 24);
        assert_eq!(RibbonVertex::buffer_layout().array_stride, 24);
    }
}
