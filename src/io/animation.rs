//! # Keyframe Animation
//!
//! Playback for glTF animation channels on imported nodes. Every clip in an asset plays at
//! once and loops over its own duration, the way a freshly loaded model animates in a
//! viewer. Tracks sample with glTF interpolation rules: step, linear (spherical for
//! rotations) and cubic Hermite splines.
//!
//! An [`ImportedMesh`](super::ImportedMesh) carries a [`MeshAnimation`] when any node on its
//! path from the scene root is animated. The mesh's world pose at a given time is the
//! composition of every node's local pose along that path.

use cgmath::{InnerSpace, Quaternion, Vector3};

use crate::gfx::transform::WorldPose;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    Linear,
    /// Hermite spline; values are stored as (in-tangent, value, out-tangent) triples
    CubicSpline,
}

/// Value types a [`Track`] can interpolate.
pub trait Keyframe: Copy {
    fn lerp(a: Self, b: Self, t: f32) -> Self;

    /// Cubic Hermite between `p0` and `p1`; tangents are already scaled by the key spacing.
    fn hermite(p0: Self, m0: Self, p1: Self, m1: Self, t: f32) -> Self;

    fn scaled(self, factor: f32) -> Self;
}

impl Keyframe for Vector3<f32> {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }

    fn hermite(p0: Self, m0: Self, p1: Self, m1: Self, t: f32) -> Self {
        let [h00, h10, h01, h11] = hermite_basis(t);
        p0 * h00 + m0 * h10 + p1 * h01 + m1 * h11
    }

    fn scaled(self, factor: f32) -> Self {
        self * factor
    }
}

impl Keyframe for Quaternion<f32> {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        // Take the short way round
        let b = if a.dot(b) < 0.0 { -b } else { b };
        a.slerp(b, t)
    }

    fn hermite(p0: Self, m0: Self, p1: Self, m1: Self, t: f32) -> Self {
        let [h00, h10, h01, h11] = hermite_basis(t);
        (p0 * h00 + m0 * h10 + p1 * h01 + m1 * h11).normalize()
    }

    fn scaled(self, factor: f32) -> Self {
        self * factor
    }
}

fn hermite_basis(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        2.0 * t3 - 3.0 * t2 + 1.0,
        t3 - 2.0 * t2 + t,
        -2.0 * t3 + 3.0 * t2,
        t3 - t2,
    ]
}

/// One animated property of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Track<T> {
    times: Vec<f32>,
    values: Vec<T>,
    interpolation: Interpolation,
    /// Loop length: the duration of the clip the track belongs to
    period: f32,
}

impl<T: Keyframe> Track<T> {
    /// Returns `None` unless the key times are finite and non-decreasing and the value
    /// count matches the interpolation.
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: Interpolation) -> Option<Self> {
        let per_key = match interpolation {
            Interpolation::CubicSpline => 3,
            Interpolation::Step | Interpolation::Linear => 1,
        };
        let ordered = times.windows(2).all(|pair| pair[0] <= pair[1]);
        if times.is_empty()
            || values.len() != times.len() * per_key
            || !ordered
            || times.iter().any(|t| !t.is_finite())
        {
            return None;
        }
        let period = times.last().copied().unwrap_or(0.0);
        Some(Self {
            times,
            values,
            interpolation,
            period,
        })
    }

    /// Loop over `period` seconds instead of the track's own last key.
    pub fn with_period(mut self, period: f32) -> Self {
        self.period = period;
        self
    }

    /// Time of the last key.
    pub fn duration(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Value at `time` seconds into the clip, held at the ends.
    pub fn sample(&self, time: f32) -> T {
        let last = self.times.len() - 1;
        let next = self.times.partition_point(|&key| key <= time);
        if next == 0 {
            return self.value(0);
        }
        if next > last {
            return self.value(last);
        }

        let k = next - 1;
        let span = self.times[next] - self.times[k];
        if span <= 0.0 {
            return self.value(next);
        }
        let t = (time - self.times[k]) / span;

        match self.interpolation {
            Interpolation::Step => self.value(k),
            Interpolation::Linear => T::lerp(self.value(k), self.value(next), t),
            Interpolation::CubicSpline => {
                let out_tangent = self.values[3 * k + 2].scaled(span);
                let in_tangent = self.values[3 * next].scaled(span);
                T::hermite(self.value(k), out_tangent, self.value(next), in_tangent, t)
            }
        }
    }

    /// Sample with the clip looping forever.
    pub fn sample_looped(&self, elapsed: f32) -> T {
        if self.period > 0.0 && elapsed.is_finite() {
            self.sample(elapsed.rem_euclid(self.period))
        } else {
            self.sample(0.0)
        }
    }

    fn value(&self, key: usize) -> T {
        match self.interpolation {
            Interpolation::CubicSpline => self.values[3 * key + 1],
            Interpolation::Step | Interpolation::Linear => self.values[key],
        }
    }
}

/// Animated properties of one node. Missing tracks hold the rest value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTracks {
    pub translation: Option<Track<Vector3<f32>>>,
    pub rotation: Option<Track<Quaternion<f32>>>,
    pub scale: Option<Track<Vector3<f32>>>,
}

impl NodeTracks {
    pub fn is_empty(&self) -> bool {
        self.translation.is_none() && self.rotation.is_none() && self.scale.is_none()
    }
}

/// A node on the path to an animated mesh
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedNode {
    pub rest: WorldPose,
    pub tracks: NodeTracks,
}

impl AnimatedNode {
    pub fn local_at(&self, elapsed: f32) -> WorldPose {
        WorldPose {
            translation: self
                .tracks
                .translation
                .as_ref()
                .map_or(self.rest.translation, |track| track.sample_looped(elapsed)),
            rotation: self
                .tracks
                .rotation
                .as_ref()
                .map_or(self.rest.rotation, |track| track.sample_looped(elapsed)),
            scale: self
                .tracks
                .scale
                .as_ref()
                .map_or(self.rest.scale, |track| track.sample_looped(elapsed)),
        }
    }
}

/// Node path from the scene root to an animated mesh, root first.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshAnimation {
    /// Applied above the scene root; import centering moves this
    pub root: WorldPose,
    pub chain: Vec<AnimatedNode>,
}

impl MeshAnimation {
    pub fn new(chain: Vec<AnimatedNode>) -> Self {
        Self {
            root: WorldPose::identity(),
            chain,
        }
    }

    /// World pose of the mesh `elapsed` seconds after playback started.
    pub fn pose_at(&self, elapsed: f32) -> WorldPose {
        self.chain
            .iter()
            .fold(self.root, |pose, node| pose.then(&node.local_at(elapsed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Rad, Rotation3};
    use std::f32::consts::FRAC_PI_2;

    fn v(x: f32, y: f32, z: f32) -> Vector3<f32> {
        Vector3::new(x, y, z)
    }

    #[test]
    fn test_track_rejects_mismatched_keys() {
        assert!(Track::new(vec![0.0, 1.0], vec![v(0.0, 0.0, 0.0)], Interpolation::Linear).is_none());
        assert!(Track::new(vec![1.0, 0.0], vec![v(0.0, 0.0, 0.0); 2], Interpolation::Step).is_none());
        assert!(Track::<Vector3<f32>>::new(vec![], vec![], Interpolation::Linear).is_none());
        assert!(Track::new(vec![0.0, 1.0], vec![v(0.0, 0.0, 0.0); 2], Interpolation::CubicSpline).is_none());
    }

    #[test]
    fn test_linear_and_step_sampling() {
        let keys = vec![v(0.0, 0.0, 0.0), v(2.0, 0.0, 0.0)];
        let linear = Track::new(vec![0.0, 1.0], keys.clone(), Interpolation::Linear).unwrap();
        assert!((linear.sample(0.25).x - 0.5).abs() < 1e-6);
        // Held past both ends
        assert_eq!(linear.sample(-1.0), keys[0]);
        assert_eq!(linear.sample(5.0), keys[1]);

        let step = Track::new(vec![0.0, 1.0], keys.clone(), Interpolation::Step).unwrap();
        assert_eq!(step.sample(0.99), keys[0]);
        assert_eq!(step.sample(1.0), keys[1]);
    }

    #[test]
    fn test_cubic_spline_hits_keys_and_uses_value_slot() {
        let zero = v(0.0, 0.0, 0.0);
        let values = vec![zero, v(0.0, 0.0, 0.0), zero, zero, v(4.0, 0.0, 0.0), zero];
        let track = Track::new(vec![0.0, 2.0], values, Interpolation::CubicSpline).unwrap();
        assert_eq!(track.sample(0.0).x, 0.0);
        assert!((track.sample(2.0).x - 4.0).abs() < 1e-6);
        // Zero tangents: smoothstep through the midpoint
        assert!((track.sample(1.0).x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotation_slerp_takes_short_path() {
        let a = Quaternion::from_angle_y(Rad(0.0));
        let b = -Quaternion::from_angle_y(Rad(FRAC_PI_2));
        let track = Track::new(vec![0.0, 1.0], vec![a, b], Interpolation::Linear).unwrap();
        let half = track.sample(0.5);
        let expected = Quaternion::from_angle_y(Rad(FRAC_PI_2 / 2.0));
        assert!(half.dot(expected).abs() > 0.9999);
    }

    #[test]
    fn test_looping_uses_clip_period() {
        let track = Track::new(
            vec![0.0, 1.0],
            vec![v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0)],
            Interpolation::Linear,
        )
        .unwrap()
        .with_period(2.0);
        assert_eq!(track.duration(), 1.0);
        assert!((track.sample_looped(2.5).x - 0.5).abs() < 1e-6);
        // Between the last key and the clip end the value holds
        assert_eq!(track.sample_looped(1.5).x, 1.0);
    }

    #[test]
    fn test_chain_composes_parent_motion() {
        let parent = AnimatedNode {
            rest: WorldPose::identity(),
            tracks: NodeTracks {
                translation: Track::new(
                    vec![0.0, 1.0],
                    vec![v(0.0, 0.0, 0.0), v(0.0, 10.0, 0.0)],
                    Interpolation::Linear,
                ),
                ..NodeTracks::default()
            },
        };
        let child = AnimatedNode {
            rest: WorldPose {
                translation: v(1.0, 0.0, 0.0),
                ..WorldPose::identity()
            },
            tracks: NodeTracks::default(),
        };
        let animation = MeshAnimation::new(vec![parent, child]);

        assert_eq!(animation.pose_at(0.0).translation, v(1.0, 0.0, 0.0));
        let halfway = animation.pose_at(0.5).translation;
        assert!((halfway - v(1.0, 5.0, 0.0)).magnitude() < 1e-5);
    }
}
