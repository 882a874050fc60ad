use sha2::{Digest, Sha512};

/// Name of the transaction family handled by this crate.
pub const FAMILY_NAME: &str = "simplewallet";
/// Version of the family's payload format.
pub const FAMILY_VERSION: &str = "1.0";

/// Hex characters of the family hash that form the namespace prefix.
pub const NAMESPACE_PREFIX_LEN: usize = 6;
/// Hex characters of the key hash that identify a single account.
pub const USER_ADDRESS_LEN: usize = 64;
/// Length of every address in the family's namespace.
pub const ADDRESS_LEN: usize = NAMESPACE_PREFIX_LEN + USER_ADDRESS_LEN;

fn sha512_hex(data: &str) -> String {
    hex::encode(Sha512::digest(data.as_bytes()))
}

/// Returns the namespace prefix claimed by `family`.
pub fn namespace_prefix(family: &str) -> String {
    let mut digest = sha512_hex(family);
    digest.truncate(NAMESPACE_PREFIX_LEN);
    digest
}

/// Derives the ledger address of the account owned by `key`.
///
/// The address is `namespace` followed by the first [`USER_ADDRESS_LEN`]
/// hex characters of the SHA-512 of `key`. Derivation is pure: the same
/// key and namespace always give the same address.
pub fn derive_address(key: &str, namespace: &str) -> String {
    let digest = sha512_hex(key);
    let mut address = String::with_capacity(namespace.len() + USER_ADDRESS_LEN);
    address.push_str(namespace);
    address.push_str(&digest[..USER_ADDRESS_LEN]);
    address
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_namespace_prefix() {
        assert_eq!(namespace_prefix(FAMILY_NAME), "7e2664");
    }

    #[test]
    fn test_derive_address_known_key() {
        let address = derive_address("alice", &namespace_prefix(FAMILY_NAME));
        assert_eq!(
            address,
            "7e2664408b27d3097eea5a46bf2ab6433a7234a33d5e49957b13ec7acc2ca08e1a13c7"
        );
        assert_eq!(address.len(), ADDRESS_LEN);
    }

    #[test]
    fn test_derive_address_is_deterministic() {
        let ns = namespace_prefix(FAMILY_NAME);
        let first = derive_address("02a1b2c3", &ns);
        let second = derive_address("02a1b2c3", &ns);
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_keys_get_distinct_addresses() {
        let ns = namespace_prefix(FAMILY_NAME);
        assert_ne!(derive_address("alice", &ns), derive_address("bob", &ns));
    }
}
