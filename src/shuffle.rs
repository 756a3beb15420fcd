// Connections – A word grouping game
// Copyright (C) 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use rand::Rng;

/// Returns a copy of `items` in a uniformly random order using a
/// Fisher–Yates shuffle.
pub fn shuffled<T, R>(items: &[T], rng: &mut R) -> Vec<T>
    where T: Clone,
          R: Rng + ?Sized
{
    let mut result = items.to_vec();

    for i in (1..result.len()).rev() {
        let j = rng.random_range(0..=i);
        result.swap(i, j);
    }

    result
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn keeps_items() {
        let mut rng = StdRng::seed_from_u64(7);
        let items = (0..16).collect::<Vec<u32>>();

        let mut result = shuffled(&items, &mut rng);

        // Source is untouched
        assert_eq!(items, (0..16).collect::<Vec<u32>>());

        result.sort_unstable();
        assert_eq!(result, items);
    }

    #[test]
    fn small_inputs() {
        let mut rng = StdRng::seed_from_u64(1);

        assert!(shuffled::<u8, _>(&[], &mut rng).is_empty());
        assert_eq!(shuffled(&["a"], &mut rng), ["a"]);
    }

    #[test]
    fn every_position_reached() {
        let mut rng = StdRng::seed_from_u64(42);
        let items = [0usize, 1, 2, 3];
        let mut seen = [[false; 4]; 4];

        for _ in 0..200 {
            for (pos, &item) in shuffled(&items, &mut rng).iter().enumerate() {
                seen[item][pos] = true;
            }
        }

        assert!(seen.iter().all(|row| row.iter().all(|&s| s)));
    }

    #[test]
    fn seeded_shuffles_repeat() {
        let items = (0..16).collect::<Vec<u32>>();

        let a = shuffled(&items, &mut StdRng::seed_from_u64(99));
        let b = shuffled(&items, &mut StdRng::seed_from_u64(99));

        assert_eq!(a, b);
    }
}
