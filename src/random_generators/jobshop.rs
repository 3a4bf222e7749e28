use crate::data_structures::shop::{JobShopInstance, Operation};

use super::{numbers::Rng, permutations::Permutation};

/// A uniformly random job-shop instance in the Taillard construction:
/// every job visits each machine exactly once, in a random order, and each
/// processing time is chosen uniformly at random from `1..=99`.
pub struct UniformJobShop<'a> {
    pub rng: &'a mut dyn Rng,
    pub jobs: u32,
    pub machines: u32,
}

impl UniformJobShop<'_> {
    /// The canonical directory for instances produced by this generator.
    pub fn path() -> String {
        String::from("./data/jobshop/")
    }

    /// The canonical file stem for the next generated instance.
    pub fn file_name(&self) -> String {
        format!("{}x{}_{}", self.jobs, self.machines, self.rng.state_id())
    }

    pub fn generate(&mut self) -> JobShopInstance {
        let mut plan = Vec::with_capacity((self.jobs * self.machines) as usize);
        for _ in 0..self.jobs {
            let machine_order = Permutation::permutation(self.rng, 0..self.machines);
            for machine in machine_order {
                plan.push(Operation {
                    machine,
                    duration: self.rng.next_u32(1..=99),
                });
            }
        }
        JobShopInstance::new(self.jobs, self.machines, self.machines, plan)
    }
}

#[cfg(test)]
mod test {
    use crate::random_generators::numbers::TaillardLCG;

    use super::*;

    #[test]
    fn test_every_job_visits_every_machine_once() {
        let mut rng = TaillardLCG::from_seed(42);
        let instance = UniformJobShop { rng: &mut rng, jobs: 5, machines: 4 }.generate();

        assert_eq!(instance.num_jobs(), 5);
        assert_eq!(instance.ops_per_job(), 4);
        for job in instance.jobs() {
            let mut visited: Vec<u32> = (0..instance.ops_per_job())
                .map(|op| instance.operation(job, op).machine)
                .collect();
            visited.sort_unstable();
            assert_eq!(visited, [0, 1, 2, 3]);
        }
    }

    #[test]
    fn test_same_seed_same_instance() {
        let mut first_rng = TaillardLCG::from_seed(7);
        let first = UniformJobShop { rng: &mut first_rng, jobs: 3, machines: 3 }.generate();
        let mut second_rng = TaillardLCG::from_seed(7);
        let second = UniformJobShop { rng: &mut second_rng, jobs: 3, machines: 3 }.generate();
        assert_eq!(first, second);
    }
}
