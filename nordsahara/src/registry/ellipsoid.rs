//! Définitions des ellipsoïdes

/// Ellipsoïde de référence, défini par son demi-grand axe et son inverse d'aplatissement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Nom usuel
    pub name: &'static str,
    /// Demi-grand axe (rayon équatorial) en mètres
    pub a: f64,
    /// Inverse de l'aplatissement
    pub rf: f64,
}

impl Ellipsoid {
    /// Ellipsoïde WGS84
    pub const WGS84: Self = Self {
        name: "WGS 84",
        a: 6378137.0,
        rf: 298.257223563,
    };

    /// Clarke 1880 (RGS), ellipsoïde du datum Nord Sahara 1959
    pub const CLARKE_1880_RGS: Self = Self {
        name: "Clarke 1880 (RGS)",
        a: 6378249.145,
        rf: 293.465,
    };

    /// Crée un ellipsoïde personnalisé
    pub const fn new(name: &'static str, a: f64, rf: f64) -> Self {
        Self { name, a, rf }
    }

    /// Aplatissement
    pub fn f(&self) -> f64 {
        1.0 / self.rf
    }

    /// Demi-petit axe (rayon polaire) en mètres
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f())
    }

    /// Première excentricité au carré
    pub fn e2(&self) -> f64 {
        let f = self.f();
        2.0 * f - f * f
    }

    /// Première excentricité
    pub fn e(&self) -> f64 {
        self.e2().sqrt()
    }

    /// Deuxième excentricité au carré
    pub fn ep2(&self) -> f64 {
        let e2 = self.e2();
        e2 / (1.0 - e2)
    }
}
