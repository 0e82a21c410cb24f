use std::sync::Arc;

use roadcast_lib::{
    bundled_network, Coordinates, Error, FallbackWeather, RoadNetwork, WeatherIngestor,
    WeatherProvider, WeatherReport,
};

struct Pinned(WeatherReport);

impl WeatherProvider for Pinned {
    fn observe(&self, _position: Coordinates) -> roadcast_lib::Result<WeatherReport> {
        Ok(self.0.clone())
    }
}

fn assert_edge_pairs_synchronized(network: &RoadNetwork) {
    for city in network.cities() {
        for (neighbor, forward) in network.neighbors(city.id) {
            let reverse = network
                .edge(neighbor, city.id)
                .unwrap_or_else(|| panic!("reverse edge missing for {} pair", city.name));
            assert_eq!(forward.weather_min, reverse.weather_min);
            assert_eq!(forward.risk, reverse.risk);
        }
    }
}

#[test]
fn refresh_synchronizes_every_edge_pair() {
    let network = bundled_network().expect("bundled network parses");
    let ingestor = WeatherIngestor::new(Arc::new(FallbackWeather::seeded(42)));

    let summary = ingestor.refresh(&network);

    assert_eq!(summary.len(), network.city_count());
    assert_edge_pairs_synchronized(&network);
}

#[test]
fn refresh_creates_missing_reverse_edges_with_mirrored_basis() {
    let network = bundled_network().expect("bundled network parses");
    let siddipet = network.city_id_by_name("Siddipet").unwrap();
    let karimnagar = network.city_id_by_name("Karimnagar").unwrap();

    // The bundled network ships one genuinely one-way road.
    let forward = network.edge(siddipet, karimnagar).expect("forward edge");
    assert!(network.edge(karimnagar, siddipet).is_none());

    let ingestor = WeatherIngestor::new(Arc::new(Pinned(WeatherReport::for_condition("Clear"))));
    ingestor.refresh(&network);

    let created = network
        .edge(karimnagar, siddipet)
        .expect("reverse edge created by the sweep");
    assert_eq!(created.distance_km, forward.distance_km);
    assert_eq!(created.traffic_min, forward.traffic_min);
    assert_eq!(created.weather_min, 2.0);
    assert_eq!(created.risk, 1.01);
}

#[test]
fn repeated_fair_weather_refreshes_converge_and_stay_put() {
    let network = bundled_network().expect("bundled network parses");
    let ingestor = WeatherIngestor::new(Arc::new(Pinned(WeatherReport::for_condition("Clear"))));

    let first = ingestor.refresh(&network);
    for entry in first.values() {
        assert_eq!(entry.condition, "Clear");
        assert_eq!(entry.delay_min, 2.0);
        assert_eq!(entry.risk, 1.01);
    }
    for city in network.cities() {
        for (_, attrs) in network.neighbors(city.id) {
            assert_eq!(attrs.weather_min, 2.0);
            assert_eq!(attrs.risk, 1.01);
        }
    }

    // A second sweep under the same input must not move anything.
    let second = ingestor.refresh(&network);
    assert_eq!(first.len(), second.len());
    for (name, entry) in &second {
        assert_eq!(entry.condition, first[name].condition);
        assert_eq!(entry.delay_min, first[name].delay_min);
        assert_eq!(entry.risk, first[name].risk);
    }
    for city in network.cities() {
        for (_, attrs) in network.neighbors(city.id) {
            assert_eq!(attrs.weather_min, 2.0);
            assert_eq!(attrs.risk, 1.01);
        }
    }
}

/// Fails for one specific coordinate, answers everywhere else.
struct Flaky {
    dead_zone: Coordinates,
    report: WeatherReport,
}

impl WeatherProvider for Flaky {
    fn observe(&self, position: Coordinates) -> roadcast_lib::Result<WeatherReport> {
        if position == self.dead_zone {
            return Err(Error::WeatherUnavailable {
                detail: "simulated outage".to_string(),
            });
        }
        Ok(self.report.clone())
    }
}

#[test]
fn a_failed_lookup_degrades_one_city_without_aborting_the_sweep() {
    let network = bundled_network().expect("bundled network parses");
    let hyderabad = network.city_id_by_name("Hyderabad").unwrap();
    let dead_zone = network.city(hyderabad).unwrap().position;

    let ingestor = WeatherIngestor::new(Arc::new(Flaky {
        dead_zone,
        report: WeatherReport::for_condition("Rain"),
    }));
    let summary = ingestor.refresh(&network);

    let degraded = &summary["Hyderabad"];
    assert_eq!(degraded.condition, "Clouds");
    assert_eq!(degraded.delay_min, 2.0);
    assert_eq!(degraded.risk, 1.01);

    let rainy = &summary["Warangal"];
    assert_eq!(rainy.condition, "Rain");
    assert_eq!(rainy.delay_min, 15.0);
    assert_eq!(rainy.risk, 1.1);

    assert_eq!(summary.len(), network.city_count());
}
