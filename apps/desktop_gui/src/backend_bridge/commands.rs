//! Backend commands queued from UI to backend worker.

use shared::{domain::UserId, protocol::UserDraft};

pub enum BackendCommand {
    FetchUsers,
    FetchUser { id: UserId },
    CreateUser { draft: UserDraft },
    UpdateUser { id: UserId, draft: UserDraft },
    DeleteUser { id: UserId },
    /// Navigation away from a screen aborts the fetch that screen started.
    CancelActiveFetch,
}
