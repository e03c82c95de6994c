use crate::model::Race;

/// Fill in missing result points from the points table.
///
/// Classified results are ranked by `pos` (ties keep input order) and the
/// rank index, not the `pos` value, selects the table slot. Points already
/// present are kept, so running this twice is a no-op. Everything else ends
/// up with 0 unless it carried explicit points.
pub fn assign_race_points(race: &mut Race, table: &[f64]) {
    let mut classified: Vec<usize> = race
        .results
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_classified())
        .map(|(idx, _)| idx)
        .collect();
    classified.sort_by_key(|idx| race.results[*idx].pos.unwrap_or(u32::MAX));

    for (rank, idx) in classified.into_iter().enumerate() {
        let result = &mut race.results[idx];
        if result.points.is_none() {
            result.points = Some(table.get(rank).copied().unwrap_or(0.0));
        }
    }

    for result in race.results.iter_mut() {
        result.points.get_or_insert(0.0);
    }
}

pub fn assign_all_points(races: &mut [Race], table: &[f64]) {
    for race in races.iter_mut() {
        assign_race_points(race, table);
    }
}
