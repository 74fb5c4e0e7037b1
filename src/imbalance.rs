// This file has code from https://github.com/LIHPC-Computational-Geometry/coupe
use num_traits::FromPrimitive;
use num_traits::ToPrimitive;
use num_traits::Zero;
use std::iter::Sum;
use std::ops::AddAssign;
use std::ops::Div;
use std::ops::Sub;

// Calculates the total load for each part of a given partition.
pub fn compute_parts_load<W>(partition: &[usize], num_parts: usize, weights: W) -> Vec<W::Item>
where
    W: IntoIterator,
    W::Item: Zero + Clone + AddAssign,
{
    let mut loads = vec![W::Item::zero(); num_parts];

    for (&part, w) in partition.iter().zip(weights.into_iter()) {
        if part < num_parts {
            loads[part] += w;
        }
    }

    loads
}

/// Compute the relative imbalance of the given partition: the largest positive
/// deviation of a part load from the ideal (total / num_parts) load.
pub fn imbalance<W>(num_parts: usize, partition: &[usize], weights: W) -> f64
where
    W: IntoIterator,
    W::Item: Clone + PartialOrd + PartialEq,
    W::Item: Zero + FromPrimitive + ToPrimitive,
    W::Item: AddAssign + Div<Output = W::Item> + Sub<Output = W::Item> + Sum,
{
    if num_parts == 0 {
        return 0.0;
    }

    let part_loads = compute_parts_load(partition, num_parts, weights);

    let total_weight: W::Item = part_loads.iter().cloned().sum();

    let ideal_part_weight =
        total_weight.to_f64().unwrap_or(0.0) / num_parts.to_f64().unwrap_or(1.0);
    if ideal_part_weight == 0.0 {
        return 0.0;
    }

    part_loads
        .into_iter()
        .map(|part_weight| {
            let part_weight: f64 = part_weight.to_f64().unwrap_or(0.0);
            (part_weight - ideal_part_weight) / ideal_part_weight
        })
        .fold(0.0f64, |acc, dev| acc.max(dev))
}
