//! Rule predicates.
//!
//! Each rule is a pure function of (instant, natal chart). A rule is the
//! union of its sub-conditions; when several hold at once, the first in
//! the rule's listing order supplies the payload. Dispositors, lords and
//! natal degrees always come from the precomputed [`NatalChart`]; only the
//! transiting longitudes are queried.

use gochara_ephem::{Ayanamsa, Body, EphemerisError, SiderealSource, angular_separation_deg};
use gochara_time::Instant;
use gochara_vedic::{
    CelestialPosition, DegreeWindow, HouseClass, Nakshatra, NatalChart, Rashi, format_dms_short,
    nakshatra_from_longitude, sign_and_degree,
};

use crate::rule_types::{Category, Hit, RuleId};

/// Orb for degree-proximity rules.
pub const CONJUNCTION_ORB_DEG: f64 = 1.0;

/// Bodies tested against natal Panaphara planets.
pub const TOUCH_TRANSITS: [Body; 10] = [
    Body::Sun,
    Body::Moon,
    Body::Mars,
    Body::Mercury,
    Body::Jupiter,
    Body::Venus,
    Body::Saturn,
    Body::Rahu,
    Body::Uranus,
    Body::Neptune,
];

/// Transiting longitudes at one instant, queried lazily and cached.
pub struct Sky<'a, S: ?Sized> {
    source: &'a S,
    at: Instant,
    ayanamsa: Ayanamsa,
    cache: [Option<f64>; 13],
}

impl<'a, S: SiderealSource + ?Sized> Sky<'a, S> {
    pub fn new(source: &'a S, at: Instant, ayanamsa: Ayanamsa) -> Self {
        Self {
            source,
            at,
            ayanamsa,
            cache: [None; 13],
        }
    }

    pub fn at(&self) -> Instant {
        self.at
    }

    pub fn longitude(&mut self, body: Body) -> Result<f64, EphemerisError> {
        if let Some(lon) = self.cache[body.index()] {
            return Ok(lon);
        }
        let lon = self.source.longitude(self.at, body, self.ayanamsa)?;
        self.cache[body.index()] = Some(lon);
        Ok(lon)
    }
}

/// A transiting body's placement against the natal chart.
#[derive(Debug, Clone, Copy)]
struct Placement {
    body: Body,
    longitude: f64,
    rashi: Rashi,
    degree: f64,
    house: u8,
}

impl Placement {
    /// Window of `class` when both house and degree belong to it.
    fn in_class(&self, class: HouseClass) -> Option<DegreeWindow> {
        if class.contains_house(self.house) {
            class.window_of(self.degree)
        } else {
            None
        }
    }
}

fn place<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
    body: Body,
) -> Result<Placement, EphemerisError> {
    let longitude = sky.longitude(body)?;
    let (rashi, degree) = sign_and_degree(longitude);
    Ok(Placement {
        body,
        longitude,
        rashi,
        degree,
        house: chart.house_of_longitude(longitude),
    })
}

/// Within the orb of a natal point, never across a sign cusp.
fn touches_natal_degree(longitude: f64, natal: &CelestialPosition) -> bool {
    sign_and_degree(longitude).0 == natal.rashi
        && angular_separation_deg(longitude, natal.longitude) <= CONJUNCTION_ORB_DEG
}

fn hit(category: Category, p: &Placement, window: String, description: String) -> Hit {
    Hit {
        category,
        variant: None,
        body: p.body.name().to_string(),
        sign: p.rashi.western_name().to_string(),
        house: p.house.to_string(),
        window,
        description,
    }
}

/// Evaluate `rule` at the sky's instant.
pub fn evaluate<S: SiderealSource + ?Sized>(
    rule: RuleId,
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    match rule {
        RuleId::Money1 => money1(sky, chart),
        RuleId::Money2 => money2(sky, chart),
        RuleId::Money3 => money3(sky, chart),
        RuleId::Money4 => money4(sky, chart),
        RuleId::Money5 => money5(sky, chart),
        RuleId::Money6 => money6(sky, chart),
        RuleId::Money7 => money7(sky, chart),
        RuleId::Money8 => money8(sky, chart),
        RuleId::Loss1 => loss1(sky, chart),
        RuleId::Loss2 => loss2(sky, chart),
        RuleId::Loss3 => loss3(sky, chart),
        RuleId::Loss4 => loss4(sky, chart),
        RuleId::Loss5 => loss5(sky, chart),
        RuleId::Loss6 => loss6(sky, chart),
    }
}

/// Evaluate `rule` at a single instant against `source`.
pub fn evaluate_at<S: SiderealSource + ?Sized>(
    rule: RuleId,
    at: Instant,
    chart: &NatalChart,
    source: &S,
) -> Result<Option<Hit>, EphemerisError> {
    let mut sky = Sky::new(source, at, chart.ayanamsa());
    evaluate(rule, &mut sky, chart)
}

fn panaphara_placement<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
    body: Body,
    describe: impl FnOnce(&Placement) -> String,
) -> Result<Option<Hit>, EphemerisError> {
    let p = place(sky, chart, body)?;
    Ok(p.in_class(HouseClass::Panaphara)
        .map(|w| hit(Category::Money, &p, w.to_string(), describe(&p))))
}

fn money1<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    let second_lord = chart.house_lord(2);
    for body in [Body::Jupiter, Body::Venus, second_lord] {
        let found = panaphara_placement(sky, chart, body, |p| {
            format!("{} in Panaphara house ({}) + Panaphara degree", p.body, p.house)
        })?;
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

fn money2<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    if chart.panaphara_planets().is_empty() {
        return Ok(None);
    }
    let p = place(sky, chart, Body::Moon)?;
    let nak = nakshatra_from_longitude(p.longitude).nakshatra;
    let lord = nak.lord();
    if !chart.is_panaphara_planet(lord) {
        return Ok(None);
    }
    Ok(HouseClass::Panaphara.window_of(p.degree).map(|w| {
        hit(
            Category::Money,
            &p,
            w.to_string(),
            format!("Moon in {nak} (owned by {lord}, a Panaphara planet) + Panaphara degree"),
        )
    }))
}

fn money3<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    let dispositor = chart.d9_second_lord_dispositor();
    panaphara_placement(sky, chart, dispositor, |p| {
        format!(
            "{} (D9 dispositor of 2L) in Panaphara house ({}) + Panaphara degree",
            p.body, p.house
        )
    })
}

fn money4<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    let venus = place(sky, chart, Body::Venus)?;
    let Some(wv) = venus.in_class(HouseClass::Panaphara) else {
        return Ok(None);
    };
    let uranus = place(sky, chart, Body::Uranus)?;
    let Some(wu) = uranus.in_class(HouseClass::Panaphara) else {
        return Ok(None);
    };
    if wv != wu {
        return Ok(None);
    }
    Ok(Some(Hit {
        category: Category::Money,
        variant: None,
        body: "Venus/Uranus".to_string(),
        sign: format!("{} / {}", venus.rashi, uranus.rashi),
        house: format!("{} / {}", venus.house, uranus.house),
        window: wv.to_string(),
        description: format!(
            "Venus in {}H + Uranus in {}H, both Panaphara house and degree (Crorepati Yoga)",
            venus.house, uranus.house
        ),
    }))
}

fn money5<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    let (l5, l9) = (chart.house_lord(5), chart.house_lord(9));
    let p5 = place(sky, chart, l5)?;
    let p9 = place(sky, chart, l9)?;
    let body = format!("{l5}/{l9}");

    if p5.rashi == p9.rashi {
        return Ok(Some(Hit {
            category: Category::Money,
            variant: None,
            body,
            sign: p5.rashi.to_string(),
            house: p5.house.to_string(),
            window: "Same Sign".to_string(),
            description: format!("5L ({l5}) and 9L ({l9}) in the same sign ({})", p5.rashi),
        }));
    }
    if p5.rashi.distance_to(p9.rashi) == 6 {
        return Ok(Some(Hit {
            category: Category::Money,
            variant: None,
            body,
            sign: format!("{} / {}", p5.rashi, p9.rashi),
            house: format!("{} / {}", p5.house, p9.house),
            window: "7th Aspect".to_string(),
            description: format!("5L ({l5}) and 9L ({l9}) in mutual 7th aspect"),
        }));
    }
    Ok(None)
}

fn money6<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    let lord = chart.house_lord(2);
    let p = place(sky, chart, lord)?;
    Ok(HouseClass::Panaphara.window_of(p.degree).map(|w| {
        hit(
            Category::Money,
            &p,
            w.to_string(),
            format!("2L ({lord}) in Panaphara degree"),
        )
    }))
}

fn money7<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    // Extremely lucky planets first: that reading takes precedence.
    for lp in chart.lucky_planets().iter().filter(|lp| lp.extremely) {
        let p = place(sky, chart, lp.body)?;
        if let Some(w) = p.in_class(HouseClass::Apoklima) {
            let mut h = hit(
                Category::Money,
                &p,
                w.to_string(),
                format!(
                    "{} ({}) in Apoklima house ({}) + Apoklima degree",
                    lp.body,
                    lp.lord_label(),
                    p.house
                ),
            );
            h.variant = Some("Extremely Lucky");
            return Ok(Some(h));
        }
    }
    for lp in chart.lucky_planets().iter().filter(|lp| !lp.extremely) {
        let p = place(sky, chart, lp.body)?;
        if HouseClass::Apoklima.contains_house(p.house)
            && HouseClass::Apoklima.window_of(p.degree).is_none()
        {
            let mut h = hit(
                Category::Money,
                &p,
                "Apoklima House".to_string(),
                format!(
                    "{} ({}) in Apoklima house ({})",
                    lp.body,
                    lp.lord_label(),
                    p.house
                ),
            );
            h.variant = Some("Lucky");
            return Ok(Some(h));
        }
    }
    Ok(None)
}

fn money8<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    let targets = chart.panaphara_planets();
    if targets.is_empty() {
        return Ok(None);
    }
    for body in TOUCH_TRANSITS {
        let lon = sky.longitude(body)?;
        for pp in targets {
            let natal = chart.position(pp.body);
            if touches_natal_degree(lon, natal) {
                let deg = format_dms_short(natal.degree_in_sign);
                return Ok(Some(Hit {
                    category: Category::Money,
                    variant: None,
                    body: body.name().to_string(),
                    sign: natal.rashi.to_string(),
                    house: pp.house.to_string(),
                    window: format!("{deg} ±1°"),
                    description: format!(
                        "{body} touches natal {} degree ({deg}) in {}",
                        pp.body, natal.rashi
                    ),
                }));
            }
        }
    }
    Ok(None)
}

fn loss1<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    for body in [Body::Saturn, Body::Venus, Body::Ketu] {
        let p = place(sky, chart, body)?;
        if let Some(w) = p.in_class(HouseClass::Apoklima) {
            return Ok(Some(hit(
                Category::Loss,
                &p,
                w.to_string(),
                format!("{body} in Apoklima house ({}) + Apoklima degree", p.house),
            )));
        }
    }
    Ok(None)
}

fn loss2<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    let p = place(sky, chart, Body::Sun)?;
    let Some(w) = HouseClass::Apoklima.window_of(p.degree) else {
        return Ok(None);
    };
    let nak = nakshatra_from_longitude(p.longitude).nakshatra;
    let lord = nak.lord();
    let ruled: Vec<String> = [6u8, 8, 12]
        .into_iter()
        .filter(|&h| chart.house_lord(h) == lord)
        .map(|h| format!("{h}L"))
        .collect();
    if ruled.is_empty() {
        return Ok(None);
    }
    Ok(Some(hit(
        Category::Loss,
        &p,
        w.to_string(),
        format!(
            "Sun in {nak} (owned by {lord}, {}) + Apoklima degree",
            ruled.join("/")
        ),
    )))
}

fn sixth_nakshatra_hit<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
    body: Body,
) -> Result<Option<Hit>, EphemerisError> {
    let natal: Nakshatra = chart.position(body).nakshatra;
    let target = natal.nth(6);
    let p = place(sky, chart, body)?;
    if !target.contains(p.longitude) {
        return Ok(None);
    }
    Ok(Some(hit(
        Category::Loss,
        &p,
        "Full Nakshatra".to_string(),
        format!("{body} in {target} (6th nakshatra from natal {body}'s {natal})"),
    )))
}

fn loss3<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    if let Some(h) = sixth_nakshatra_hit(sky, chart, Body::Moon)? {
        return Ok(Some(h));
    }
    sixth_nakshatra_hit(sky, chart, Body::Sun)
}

fn loss4<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    let neptune = chart.position(Body::Neptune);
    let p = place(sky, chart, Body::Moon)?;
    if !touches_natal_degree(p.longitude, neptune) {
        return Ok(None);
    }
    let deg = format_dms_short(neptune.degree_in_sign);
    let mut h = hit(
        Category::Loss,
        &p,
        format!("{deg} ±1°"),
        format!(
            "Moon conjunct natal Neptune degree ({deg}) in {}",
            neptune.rashi
        ),
    );
    h.sign = neptune.rashi.to_string();
    Ok(Some(h))
}

fn loss5<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    let (l6, l8) = (chart.house_lord(6), chart.house_lord(8));
    let p6 = place(sky, chart, l6)?;
    let p8 = place(sky, chart, l8)?;
    // 6/8: one is 6th from the other, so the forward distance is 5 or 7.
    if !matches!(p6.rashi.distance_to(p8.rashi), 5 | 7) {
        return Ok(None);
    }
    Ok(Some(Hit {
        category: Category::Expense,
        variant: None,
        body: format!("{l6}/{l8}"),
        sign: format!("{} / {}", p6.rashi, p8.rashi),
        house: format!("{} / {}", p6.house, p8.house),
        window: "6/8 Relation".to_string(),
        description: format!("6L ({l6}) and 8L ({l8}) in 6/8 relationship"),
    }))
}

/// Nakshatras that turn a Loss #6 event into money: those ruled by a
/// natal Panaphara planet or the 2nd, 5th or 9th lord, Swati excepted.
fn is_loss6_exception(chart: &NatalChart, nak: Nakshatra) -> bool {
    if nak == Nakshatra::Swati {
        return false;
    }
    let lord = nak.lord();
    chart.is_panaphara_planet(lord) || [2u8, 5, 9].iter().any(|&h| chart.house_lord(h) == lord)
}

fn loss6<S: SiderealSource + ?Sized>(
    sky: &mut Sky<'_, S>,
    chart: &NatalChart,
) -> Result<Option<Hit>, EphemerisError> {
    let p = place(sky, chart, Body::Sun)?;
    if !matches!(p.house, 3 | 6 | 8 | 12) {
        return Ok(None);
    }
    let nak = nakshatra_from_longitude(p.longitude).nakshatra;
    let lord = nak.lord();
    let h = if is_loss6_exception(chart, nak) {
        let mut h = hit(
            Category::Money,
            &p,
            "Full Sign".to_string(),
            format!(
                "Sun in {}H ({}) in {nak} (owned by {lord}, a money significator)",
                p.house, p.rashi
            ),
        );
        h.variant = Some("Exception");
        h
    } else {
        hit(
            Category::Loss,
            &p,
            "Full Sign".to_string(),
            format!("Sun in {}H ({}) in {nak}", p.house, p.rashi),
        )
    };
    Ok(Some(h))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use gochara_ephem::{GeoLocation, HouseCusps, HouseSystem, normalize_deg};
    use gochara_vedic::HouseFramework;

    use super::*;

    /// Fixed longitudes per body; counts queries.
    struct Frozen {
        lons: [f64; 13],
        calls: AtomicUsize,
    }

    impl Frozen {
        fn new(lons: [f64; 13]) -> Self {
            Self {
                lons,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SiderealSource for Frozen {
        fn longitude(&self, _: Instant, body: Body, _: Ayanamsa) -> Result<f64, EphemerisError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(self.lons[body.index()])
        }
    }

    fn chart(asc: f64, placements: &[(Body, f64)]) -> NatalChart {
        let mut lons = [asc; 13];
        for &(b, l) in placements {
            lons[b.index()] = l;
        }
        lons[Body::Ascendant.index()] = asc;
        NatalChart::from_longitudes(
            Instant::from_unix_seconds(0),
            GeoLocation::new(0.0, 0.0),
            Ayanamsa::Lahiri,
            HouseFramework::WholeSign,
            lons,
            HouseCusps {
                cusps: std::array::from_fn(|i| normalize_deg(asc + 30.0 * i as f64)),
                ascendant_deg: asc,
                mc_deg: normalize_deg(asc + 270.0),
                system: HouseSystem::Porphyry,
            },
        )
    }

    fn sky_at(placements: &[(Body, f64)]) -> Frozen {
        // Unplaced transits sit at 0° Aries.
        let mut lons = [0.0; 13];
        for &(b, l) in placements {
            lons[b.index()] = l;
        }
        Frozen::new(lons)
    }

    fn eval(rule: RuleId, chart: &NatalChart, sky: &Frozen) -> Option<Hit> {
        evaluate_at(rule, Instant::from_unix_seconds(0), chart, sky).unwrap()
    }

    #[test]
    fn sky_caches_queries() {
        let src = sky_at(&[(Body::Moon, 12.0)]);
        let mut sky = Sky::new(&src, Instant::from_unix_seconds(0), Ayanamsa::Lahiri);
        for _ in 0..3 {
            assert_eq!(sky.longitude(Body::Moon).unwrap(), 12.0);
        }
        assert_eq!(src.calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn money1_jupiter_in_second_house_window() {
        // Aries rising: Taurus is house 2.
        let natal = chart(15.0, &[]);
        let hit = eval(RuleId::Money1, &natal, &sky_at(&[(Body::Jupiter, 41.0)])).unwrap();
        assert_eq!(hit.body, "Jupiter");
        assert_eq!(hit.house, "2");
        assert_eq!(hit.sign, "Taurus");
        assert_eq!(hit.window, "10°00' - 12°30'");

        // Right house, wrong degree.
        assert!(eval(RuleId::Money1, &natal, &sky_at(&[(Body::Jupiter, 45.0)])).is_none());
    }

    #[test]
    fn money1_first_listed_body_supplies_payload() {
        let natal = chart(15.0, &[]);
        let both = sky_at(&[(Body::Jupiter, 41.0), (Body::Venus, 123.0)]);
        assert_eq!(eval(RuleId::Money1, &natal, &both).unwrap().body, "Jupiter");
    }

    #[test]
    fn money2_needs_panaphara_planet_nakshatra() {
        // Venus natal in Taurus 11° (house 2 + window) is a Panaphara planet.
        let natal = chart(15.0, &[(Body::Venus, 41.0)]);
        assert!(natal.is_panaphara_planet(Body::Venus));
        // Bharani (13°20'–26°40') is Venus-ruled; Mesha 18° is in a Panaphara window.
        let hit = eval(RuleId::Money2, &natal, &sky_at(&[(Body::Moon, 18.0)])).unwrap();
        assert!(hit.description.contains("Bharani"));
        // Krittika (Sun) is not.
        assert!(eval(RuleId::Money2, &natal, &sky_at(&[(Body::Moon, 27.0)])).is_none());
    }

    #[test]
    fn money3_follows_d9_dispositor() {
        // Aries rising: 2L Venus at Mesha 4° → D9 Vrishabha → Venus again.
        let natal = chart(15.0, &[(Body::Venus, 4.0)]);
        assert_eq!(natal.d9_second_lord_dispositor(), Body::Venus);
        let hit = eval(RuleId::Money3, &natal, &sky_at(&[(Body::Venus, 33.0)])).unwrap();
        assert_eq!(hit.house, "2");
        assert!(hit.description.contains("D9 dispositor"));
    }

    #[test]
    fn money6_any_sign() {
        let natal = chart(15.0, &[]);
        let hit = eval(RuleId::Money6, &natal, &sky_at(&[(Body::Venus, 3.0)])).unwrap();
        assert_eq!(hit.house, "1");
        assert_eq!(hit.window, "02°30' - 05°00'");
        assert!(eval(RuleId::Money6, &natal, &sky_at(&[(Body::Venus, 6.0)])).is_none());
    }

    #[test]
    fn money4_needs_same_window() {
        // Aries rising: Taurus (2) and Leo (5) are Panaphara.
        let natal = chart(15.0, &[]);
        let same = sky_at(&[(Body::Venus, 30.0 + 3.0), (Body::Uranus, 120.0 + 4.0)]);
        let hit = eval(RuleId::Money4, &natal, &same).unwrap();
        assert_eq!(hit.house, "2 / 5");
        assert_eq!(hit.sign, "Taurus / Leo");
        let different = sky_at(&[(Body::Venus, 30.0 + 3.0), (Body::Uranus, 120.0 + 11.0)]);
        assert!(eval(RuleId::Money4, &natal, &different).is_none());
    }

    #[test]
    fn money5_same_and_opposite_signs() {
        // Aries rising: 5L Sun, 9L Jupiter.
        let natal = chart(15.0, &[]);
        let same = sky_at(&[(Body::Sun, 100.0), (Body::Jupiter, 110.0)]);
        assert_eq!(eval(RuleId::Money5, &natal, &same).unwrap().window, "Same Sign");
        let opposite = sky_at(&[(Body::Sun, 100.0), (Body::Jupiter, 280.0)]);
        assert_eq!(eval(RuleId::Money5, &natal, &opposite).unwrap().window, "7th Aspect");
        let square = sky_at(&[(Body::Sun, 100.0), (Body::Jupiter, 190.0)]);
        assert!(eval(RuleId::Money5, &natal, &square).is_none());
    }

    #[test]
    fn money7_extremely_lucky_takes_precedence() {
        // Aries rising: Mercury rules 3 and 6; natal Mercury in Virgo 6°
        // (extremely lucky). Jupiter rules 9 and 12; natal Jupiter in
        // Sagittarius 16° (lucky).
        let natal = chart(15.0, &[(Body::Mercury, 156.0), (Body::Jupiter, 256.0)]);
        let both = sky_at(&[(Body::Mercury, 60.0 + 6.0), (Body::Jupiter, 330.0 + 1.0)]);
        let hit = eval(RuleId::Money7, &natal, &both).unwrap();
        assert_eq!(hit.variant, Some("Extremely Lucky"));
        assert_eq!(hit.body, "Mercury");
        assert!(hit.description.contains("3L/6L"));

        let lucky_only = sky_at(&[(Body::Mercury, 0.0), (Body::Jupiter, 330.0 + 1.0)]);
        let hit = eval(RuleId::Money7, &natal, &lucky_only).unwrap();
        assert_eq!(hit.variant, Some("Lucky"));
        assert_eq!(hit.house, "12");

        // A lucky planet inside an Apoklima degree does not count as Lucky.
        let in_degree = sky_at(&[(Body::Mercury, 0.0), (Body::Jupiter, 330.0 + 6.0)]);
        assert!(eval(RuleId::Money7, &natal, &in_degree).is_none());
    }

    #[test]
    fn money8_and_loss4_orb_edges() {
        let natal = chart(15.0, &[(Body::Venus, 41.0), (Body::Neptune, 200.0)]);
        let inside = sky_at(&[(Body::Mars, 41.9)]);
        let hit = eval(RuleId::Money8, &natal, &inside).unwrap();
        assert_eq!(hit.body, "Mars");
        assert_eq!(hit.window, "11°00' ±1°");
        assert!(eval(RuleId::Money8, &natal, &sky_at(&[(Body::Mars, 42.2)])).is_none());

        assert!(eval(RuleId::Loss4, &natal, &sky_at(&[(Body::Moon, 199.1)])).is_some());
        assert!(eval(RuleId::Loss4, &natal, &sky_at(&[(Body::Moon, 201.2)])).is_none());
    }

    #[test]
    fn loss1_and_loss5() {
        // Aries rising: Gemini (3) is Apoklima; 6L Mercury, 8L Mars.
        let natal = chart(15.0, &[]);
        let saturn = sky_at(&[(Body::Saturn, 60.0 + 13.0)]);
        assert_eq!(eval(RuleId::Loss1, &natal, &saturn).unwrap().body, "Saturn");

        let six_eight = sky_at(&[(Body::Mercury, 10.0), (Body::Mars, 160.0)]);
        let hit = eval(RuleId::Loss5, &natal, &six_eight).unwrap();
        assert_eq!(hit.category, Category::Expense);
        assert_eq!(hit.body, "Mercury/Mars");
        let trine = sky_at(&[(Body::Mercury, 10.0), (Body::Mars, 130.0)]);
        assert!(eval(RuleId::Loss5, &natal, &trine).is_none());
    }

    #[test]
    fn loss2_sun_in_malefic_lord_nakshatra() {
        // Aries rising: 6L Mercury. Ashlesha (Mercury) spans Karka 16°40'–30°.
        let natal = chart(15.0, &[]);
        let hit = eval(RuleId::Loss2, &natal, &sky_at(&[(Body::Sun, 111.0)])).unwrap();
        assert!(hit.description.contains("Ashlesha"));
        assert!(hit.description.contains("6L"));
        assert_eq!(hit.window, "20°00' - 22°30'");
        // Same nakshatra, outside the Apoklima windows.
        assert!(eval(RuleId::Loss2, &natal, &sky_at(&[(Body::Sun, 116.0)])).is_none());
    }

    #[test]
    fn loss3_sixth_nakshatra() {
        // Natal Moon in Ashwini: the 6th is Ardra (66°40'–80°).
        let natal = chart(15.0, &[(Body::Moon, 5.0), (Body::Sun, 200.0)]);
        let hit = eval(RuleId::Loss3, &natal, &sky_at(&[(Body::Moon, 70.0)])).unwrap();
        assert_eq!(hit.body, "Moon");
        assert!(hit.description.contains("Ardra"));
        assert!(eval(RuleId::Loss3, &natal, &sky_at(&[(Body::Moon, 81.0)])).is_none());
    }

    #[test]
    fn loss6_exception_turns_money() {
        // Aries rising: 2L Venus, 5L Sun, 9L Jupiter. Sun in Gemini (3rd).
        let natal = chart(15.0, &[]);
        // Gemini 24° → Punarvasu (Jupiter) → exception.
        let hit = eval(RuleId::Loss6, &natal, &sky_at(&[(Body::Sun, 84.0)])).unwrap();
        assert_eq!(hit.category, Category::Money);
        assert_eq!(hit.variant, Some("Exception"));
        // Gemini 10° → Ardra (Rahu) → plain loss.
        let hit = eval(RuleId::Loss6, &natal, &sky_at(&[(Body::Sun, 70.0)])).unwrap();
        assert_eq!(hit.category, Category::Loss);
        // Sun in the 4th: no event.
        assert!(eval(RuleId::Loss6, &natal, &sky_at(&[(Body::Sun, 100.0)])).is_none());
    }

    #[test]
    fn swati_never_exempts() {
        // Libra rising, natal Rahu at Scorpio (2nd) 11°: a Panaphara planet.
        let natal = chart(195.0, &[(Body::Rahu, 221.0)]);
        assert!(natal.is_panaphara_planet(Body::Rahu));
        assert!(!is_loss6_exception(&natal, Nakshatra::Swati));
        assert!(is_loss6_exception(&natal, Nakshatra::Ardra));
    }
}
