//! Synthetic yard data for first runs and demos

use core_fleet::yard::{all_positions, SlotPosition};
use core_fleet::{new_local_id, Moto, MotoStatus, Vaga, VagaStatus};
use rand::seq::SliceRandom;
use rand::Rng;

/// Chance that a generated slot holds a motorcycle
pub const OCCUPANCY_PROBABILITY: f64 = 0.35;

const MODELOS: &[&str] = &[
    "Mottu Sport 110i",
    "Mottu-E",
    "Honda Pop 110i",
    "Honda CG 160",
    "Yamaha Factor 150",
];

const CORES: &[&str] = &["Preta", "Branca", "Vermelha", "Azul", "Cinza", "Prata"];

/// Output of one generator run.
#[derive(Debug, Clone, PartialEq)]
pub struct MockYard {
    pub vagas: Vec<Vaga>,
    pub motos: Vec<Moto>,
}

/// Full grid, with one synthetic motorcycle per occupied slot.
pub fn generate_mock_data<R: Rng + ?Sized>(rng: &mut R) -> MockYard {
    let mut vagas = Vec::new();
    let mut motos = Vec::new();

    for position in all_positions() {
        let (latitude, longitude) = position.coordinates();
        let occupied = rng.gen_bool(OCCUPANCY_PROBABILITY);

        let moto_id = if occupied {
            let moto = mock_moto(rng, &position, latitude, longitude);
            let id = moto.id.clone();
            motos.push(moto);
            Some(id)
        } else {
            None
        };

        vagas.push(Vaga {
            id: format!("vaga-{}", position.label()),
            identificacao: position.label(),
            status: if occupied {
                VagaStatus::Ocupada
            } else {
                VagaStatus::Livre
            },
            latitude,
            longitude,
            moto_id,
        });
    }

    MockYard { vagas, motos }
}

fn mock_moto<R: Rng + ?Sized>(
    rng: &mut R,
    position: &SlotPosition,
    latitude: f64,
    longitude: f64,
) -> Moto {
    Moto {
        id: new_local_id(),
        placa: mercosul_plate(rng),
        modelo: pick(rng, MODELOS).to_string(),
        ano: rng.gen_range(2018..=2024),
        cor: pick(rng, CORES).to_string(),
        filial_id: String::new(),
        status: MotoStatus::Ocupada,
        vaga: Some(position.label()),
        condutor: None,
        latitude: Some(latitude),
        longitude: Some(longitude),
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

/// Mercosul layout: three letters, digit, letter, two digits (e.g. `BRA2E19`)
pub fn mercosul_plate<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut letter = || char::from(rng.gen_range(b'A'..=b'Z'));
    let prefix: String = (0..3).map(|_| letter()).collect();
    let middle = letter();
    format!(
        "{}{}{}{:02}",
        prefix,
        rng.gen_range(0..10),
        middle,
        rng.gen_range(0..100)
    )
}
