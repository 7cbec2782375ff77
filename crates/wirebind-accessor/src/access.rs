//! Member access binding.
//!
//! Turns a [`MemberDescriptor`] into direct getter/setter callables. All
//! checks happen here, at bind time; the returned callables do no lookup.

use std::any::type_name;

use crate::error::BindingError;
use crate::member::{Getter, MemberDescriptor, Setter, TypedAccess};

/// Capabilities a caller needs from a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
    ReadWrite,
}

impl Access {
    pub fn needs_read(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    pub fn needs_write(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }
}

/// Bind a direct getter for `member`.
///
/// Fails if the member is not readable or is not declared as `T`.
pub fn bind_getter<H, T>(member: &MemberDescriptor<H>) -> Result<Getter<H, T>, BindingError>
where
    H: 'static,
    T: Clone + 'static,
{
    if !member.is_readable() {
        return Err(not_readable(member));
    }
    typed::<H, T>(member)?
        .getter
        .clone()
        .ok_or_else(|| not_readable(member))
}

/// Bind a direct setter for `member`.
///
/// Fails if the member is not writable or is not declared as `T`. A member
/// without a setter never yields a no-op setter.
pub fn bind_setter<H, T>(member: &MemberDescriptor<H>) -> Result<Setter<H, T>, BindingError>
where
    H: 'static,
    T: Clone + 'static,
{
    if !member.is_writable() {
        return Err(not_writable(member));
    }
    typed::<H, T>(member)?
        .setter
        .clone()
        .ok_or_else(|| not_writable(member))
}

/// Check that `member` offers every capability in `access`.
pub fn require_access<H>(member: &MemberDescriptor<H>, access: Access) -> Result<(), BindingError> {
    if access.needs_read() && !member.is_readable() {
        return Err(not_readable(member));
    }
    if access.needs_write() && !member.is_writable() {
        return Err(not_writable(member));
    }
    Ok(())
}

fn typed<H, T>(member: &MemberDescriptor<H>) -> Result<&TypedAccess<H, T>, BindingError>
where
    H: 'static,
    T: Clone + 'static,
{
    member
        .typed_access::<T>()
        .ok_or_else(|| BindingError::TypeMismatch {
            host: type_name::<H>(),
            member: member.name().to_string(),
            declared: member.value_type().name(),
            requested: type_name::<T>(),
        })
}

fn not_readable<H>(member: &MemberDescriptor<H>) -> BindingError {
    BindingError::NotReadable {
        host: type_name::<H>(),
        member: member.name().to_string(),
    }
}

fn not_writable<H>(member: &MemberDescriptor<H>) -> BindingError {
    BindingError::NotWritable {
        host: type_name::<H>(),
        member: member.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Account {
        id: u64,
        balance: i64,
        owner: String,
    }

    fn id() -> MemberDescriptor<Account> {
        MemberDescriptor::field("id", |a: &Account| &a.id, |a: &mut Account, v| a.id = v)
    }

    fn owner_read_only() -> MemberDescriptor<Account> {
        MemberDescriptor::read_only_field("owner", |a: &Account| &a.owner)
    }

    fn deposit_write_only() -> MemberDescriptor<Account> {
        MemberDescriptor::write_only("deposit", |a: &mut Account, v: i64| a.balance += v)
    }

    #[test]
    fn getter_reads_current_value() {
        let getter = bind_getter::<Account, u64>(&id()).unwrap();
        let mut account = Account {
            id: 7,
            ..Account::default()
        };
        assert_eq!(*getter(&account), 7);
        account.id = 8;
        assert_eq!(*getter(&account), 8);
    }

    #[test]
    fn setter_assigns_into_instance() {
        let setter = bind_setter::<Account, u64>(&id()).unwrap();
        let mut account = Account::default();
        setter(&mut account, 99);
        assert_eq!(account.id, 99);

        let deposit = bind_setter::<Account, i64>(&deposit_write_only()).unwrap();
        deposit(&mut account, 10);
        deposit(&mut account, 5);
        assert_eq!(account.balance, 15);
    }

    #[test]
    fn setter_on_read_only_member_fails() {
        let result = bind_setter::<Account, String>(&owner_read_only());
        assert!(matches!(
            result,
            Err(BindingError::NotWritable { ref member, .. }) if member == "owner"
        ));
    }

    #[test]
    fn getter_on_write_only_member_fails() {
        let result = bind_getter::<Account, i64>(&deposit_write_only());
        assert!(matches!(result, Err(BindingError::NotReadable { .. })));
    }

    #[test]
    fn mismatched_value_type_fails() {
        match bind_getter::<Account, u32>(&id()) {
            Err(BindingError::TypeMismatch {
                declared,
                requested,
                ..
            }) => {
                assert_eq!(declared, "u64");
                assert_eq!(requested, "u32");
            }
            Err(other) => panic!("expected type mismatch, got {other}"),
            Ok(_) => panic!("expected type mismatch"),
        }
    }

    #[test]
    fn require_access_checks_each_capability() {
        assert!(require_access(&id(), Access::ReadWrite).is_ok());
        assert!(require_access(&owner_read_only(), Access::Read).is_ok());
        assert!(matches!(
            require_access(&owner_read_only(), Access::ReadWrite),
            Err(BindingError::NotWritable { .. })
        ));
        assert!(matches!(
            require_access(&deposit_write_only(), Access::Read),
            Err(BindingError::NotReadable { .. })
        ));
    }
}
