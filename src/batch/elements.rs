//! Osculating Keplerian elements from an inertial state vector.

pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;

const MU_EARTH_KM3_S2: f64 = 398_600.4418;

// Below this, eccentricity / node vectors are treated as degenerate.
const SMALL: f64 = 1e-8;

/// Instantaneous classical elements, angles in degrees.
#[derive(Debug, Clone, Copy)]
pub struct OsculatingElements {
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub argument_of_perigee_deg: f64,
    pub true_anomaly_deg: f64,
}

impl OsculatingElements {
    /// Argument of perigee + true anomaly, wrapped to [0, 360).
    pub fn latitude_argument_deg(&self) -> f64 {
        (self.argument_of_perigee_deg + self.true_anomaly_deg).rem_euclid(360.0)
    }
}

/// Convert a TEME position/velocity pair (km, km/s) to osculating elements.
///
/// Degenerate cases follow the usual conventions: a circular orbit takes
/// argument of perigee 0 and measures the anomaly from the ascending node;
/// an equatorial orbit takes RAAN 0 and measures from the x axis. Either way
/// the latitude argument stays continuous.
pub fn elements_from_state(position_km: [f64; 3], velocity_km_s: [f64; 3]) -> OsculatingElements {
    let r = norm(position_km);
    let v2 = dot(velocity_km_s, velocity_km_s);
    let radial_speed = dot(position_km, velocity_km_s) / r;

    let h = cross(position_km, velocity_km_s);
    let h_norm = norm(h);

    // Node vector: z-hat x h.
    let node = [-h[1], h[0], 0.0];
    let node_norm = norm(node);

    let mut e_vec = [0.0; 3];
    for axis in 0..3 {
        e_vec[axis] = ((v2 - MU_EARTH_KM3_S2 / r) * position_km[axis]
            - r * radial_speed * velocity_km_s[axis])
            / MU_EARTH_KM3_S2;
    }
    let eccentricity = norm(e_vec);

    let energy = v2 / 2.0 - MU_EARTH_KM3_S2 / r;
    let semi_major_axis_km = -MU_EARTH_KM3_S2 / (2.0 * energy);

    let inclination = clamped_acos(h[2] / h_norm);

    let raan = if node_norm > SMALL {
        let raw = clamped_acos(node[0] / node_norm);
        if node[1] < 0.0 {
            std::f64::consts::TAU - raw
        } else {
            raw
        }
    } else {
        0.0
    };

    let (argument_of_perigee, true_anomaly) = if eccentricity > SMALL {
        let aop = if node_norm > SMALL {
            let raw = clamped_acos(dot(node, e_vec) / (node_norm * eccentricity));
            if e_vec[2] < 0.0 {
                std::f64::consts::TAU - raw
            } else {
                raw
            }
        } else {
            // Equatorial: measure perigee from the x axis.
            let raw = clamped_acos(e_vec[0] / eccentricity);
            if e_vec[1] < 0.0 {
                std::f64::consts::TAU - raw
            } else {
                raw
            }
        };
        let raw = clamped_acos(dot(e_vec, position_km) / (eccentricity * r));
        let ta = if radial_speed < 0.0 {
            std::f64::consts::TAU - raw
        } else {
            raw
        };
        (aop, ta)
    } else if node_norm > SMALL {
        // Circular inclined: anomaly from the ascending node.
        let raw = clamped_acos(dot(node, position_km) / (node_norm * r));
        let ta = if position_km[2] < 0.0 {
            std::f64::consts::TAU - raw
        } else {
            raw
        };
        (0.0, ta)
    } else {
        // Circular equatorial: true longitude from the x axis.
        let raw = clamped_acos(position_km[0] / r);
        let ta = if position_km[1] < 0.0 {
            std::f64::consts::TAU - raw
        } else {
            raw
        };
        (0.0, ta)
    };

    OsculatingElements {
        semi_major_axis_km,
        eccentricity,
        inclination_deg: inclination.to_degrees(),
        raan_deg: raan.to_degrees().rem_euclid(360.0),
        argument_of_perigee_deg: argument_of_perigee.to_degrees().rem_euclid(360.0),
        true_anomaly_deg: true_anomaly.to_degrees().rem_euclid(360.0),
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

fn clamped_acos(value: f64) -> f64 {
    value.clamp(-1.0, 1.0).acos()
}
