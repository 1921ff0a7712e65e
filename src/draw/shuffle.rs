use rand::Rng;

/// Mélange de Fisher–Yates en place : pour i de n-1 à 1, j uniforme dans [0, i].
pub fn fisher_yates<T, R: Rng + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Vrai si aucune position ne porte le même élément dans les deux suites.
pub fn is_derangement<T: PartialEq>(givers: &[T], receivers: &[T]) -> bool {
    givers.len() == receivers.len() && givers.iter().zip(receivers).all(|(g, r)| g != r)
}

/// Repli déterministe : receveur[k] = donneur[(k + 1) mod n].
///
/// Sans point fixe dès que n >= 2 (et éléments distincts), mais toujours le
/// même cycle : aucune équiprobabilité.
pub fn rotate_by_one<T: Clone>(givers: &[T]) -> Vec<T> {
    let mut out = givers.to_vec();
    if !out.is_empty() {
        out.rotate_left(1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rotation_shifts_by_one() {
        assert_eq!(rotate_by_one(&['a', 'b', 'c', 'd']), vec!['b', 'c', 'd', 'a']);
        assert!(rotate_by_one::<u8>(&[]).is_empty());
    }

    #[test]
    fn rotation_has_no_fixed_point() {
        for n in 2..50u32 {
            let givers: Vec<u32> = (0..n).collect();
            assert!(is_derangement(&givers, &rotate_by_one(&givers)), "n = {n}");
        }
    }

    #[test]
    fn shuffle_keeps_every_element() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut items: Vec<u32> = (0..64).collect();
        fisher_yates(&mut rng, &mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn derangement_check() {
        assert!(is_derangement(&[1, 2, 3], &[2, 3, 1]));
        assert!(!is_derangement(&[1, 2, 3], &[1, 3, 2]));
        assert!(!is_derangement(&[1, 2, 3], &[2, 1]));
    }
}
