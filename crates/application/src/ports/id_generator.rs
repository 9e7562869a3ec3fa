/// External collaborator: mints opaque, DNS-label-safe hook ids. Required
/// properties (spec.md §4.2): collision-free with overwhelming probability
/// across the process lifetime, lowercase alnum, length <= 32.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Default implementation: 8 random bytes rendered as 16 lowercase hex
/// characters — well within the DNS label budget of spec.md §9.
#[derive(Debug, Default)]
pub struct HexIdGenerator;

impl IdGenerator for HexIdGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; 8];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        hex::encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_dns_label_safe() {
        let gen = HexIdGenerator;
        let id = gen.generate();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
    }

    #[test]
    fn successive_ids_differ() {
        let gen = HexIdGenerator;
        let a = gen.generate();
        let b = gen.generate();
        assert_ne!(a, b);
    }
}
