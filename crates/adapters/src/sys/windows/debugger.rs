// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The debug pump: a thread that creates the child as its debuggee and
//! answers debug events until the child exits.

use std::ffi::c_void;
use std::io;
use std::os::windows::io::{AsRawHandle, FromRawHandle, OwnedHandle};
use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc};
use std::thread;

use windows_sys::Wdk::System::Threading::{
    NtQueryInformationProcess, ProcessBasicInformation, ProcessWow64Information,
};
use windows_sys::Win32::Foundation::{
    CloseHandle, DuplicateHandle, GetLastError, BOOL, DBG_CONTINUE, DBG_EXCEPTION_NOT_HANDLED,
    DUPLICATE_SAME_ACCESS, ERROR_NOACCESS, ERROR_PARTIAL_COPY, FALSE, HANDLE,
    INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::Globalization::{MultiByteToWideChar, CP_ACP};
use windows_sys::Win32::System::Diagnostics::Debug::{
    ContinueDebugEvent, DebugActiveProcessStop, DebugSetProcessKillOnExit, ReadProcessMemory,
    WaitForDebugEvent, CREATE_PROCESS_DEBUG_EVENT, CREATE_THREAD_DEBUG_EVENT, DEBUG_EVENT,
    EXCEPTION_DEBUG_EVENT, EXIT_PROCESS_DEBUG_EVENT, EXIT_THREAD_DEBUG_EVENT, LOAD_DLL_DEBUG_EVENT,
    OUTPUT_DEBUG_STRING_EVENT, UNLOAD_DLL_DEBUG_EVENT,
};
use windows_sys::Win32::System::SystemInformation::GetVersion;
use windows_sys::Win32::System::Threading::{
    GetCurrentProcess, IsWow64Process, INFINITE, PROCESS_BASIC_INFORMATION,
};
use wsh_core::debug::peb::{self, MemoryReader, PebLayout, ReadFailure};
use wsh_core::debug::{
    CapturedState, ContinueStatus, DebugApi, DebugError, DebugEvent, DebugSession,
};
use wsh_core::env::BlockEncoding;

use crate::process::{build_command, LaunchError, LaunchRequest, SystemChild};

fn os_error(action: &'static str) -> DebugError {
    DebugError::Os { action, source: io::Error::last_os_error() }
}

fn file_handle(handle: HANDLE) -> Option<HANDLE> {
    (handle != 0 && handle != INVALID_HANDLE_VALUE).then_some(handle)
}

fn convert_event(event: &DEBUG_EVENT) -> DebugEvent<HANDLE> {
    let (pid, tid) = (event.dwProcessId, event.dwThreadId);
    // SAFETY: each arm reads the union member dwDebugEventCode selects.
    unsafe {
        match event.dwDebugEventCode {
            CREATE_PROCESS_DEBUG_EVENT => {
                let info = event.u.CreateProcessInfo;
                DebugEvent::CreateProcess {
                    pid,
                    tid,
                    process: info.hProcess,
                    thread: info.hThread,
                    file: file_handle(info.hFile),
                }
            }
            EXIT_PROCESS_DEBUG_EVENT => {
                DebugEvent::ExitProcess { pid, tid, exit_code: event.u.ExitProcess.dwExitCode }
            }
            CREATE_THREAD_DEBUG_EVENT => DebugEvent::CreateThread { pid, tid },
            EXIT_THREAD_DEBUG_EVENT => DebugEvent::ExitThread { pid, tid },
            LOAD_DLL_DEBUG_EVENT => {
                DebugEvent::LoadDll { pid, tid, file: file_handle(event.u.LoadDll.hFile) }
            }
            UNLOAD_DLL_DEBUG_EVENT => DebugEvent::UnloadDll { pid, tid },
            EXCEPTION_DEBUG_EVENT => {
                let info = event.u.Exception;
                DebugEvent::Exception {
                    pid,
                    tid,
                    code: info.ExceptionRecord.ExceptionCode as u32,
                    first_chance: info.dwFirstChance != 0,
                }
            }
            OUTPUT_DEBUG_STRING_EVENT => DebugEvent::OutputDebugString { pid, tid },
            _ => DebugEvent::Rip { pid, tid },
        }
    }
}

/// Reads another process's memory.
struct ProcessMemory(HANDLE);

impl MemoryReader for ProcessMemory {
    fn read(&self, address: u64, buf: &mut [u8]) -> Result<(), ReadFailure> {
        let address = usize::try_from(address).map_err(|_| ReadFailure::Other)?;
        let mut read = 0usize;
        // SAFETY: `buf` is valid for `buf.len()` bytes.
        let ok = unsafe {
            ReadProcessMemory(
                self.0,
                address as *const c_void,
                buf.as_mut_ptr().cast(),
                buf.len(),
                &mut read,
            )
        };
        if ok != 0 {
            return if read == buf.len() { Ok(()) } else { Err(ReadFailure::PartialCopy) };
        }
        // SAFETY: no preconditions.
        match unsafe { GetLastError() } {
            ERROR_PARTIAL_COPY => Err(ReadFailure::PartialCopy),
            ERROR_NOACCESS => Err(ReadFailure::NoAccess),
            _ => Err(ReadFailure::Other),
        }
    }
}

fn is_wow64(process: HANDLE) -> Result<bool, DebugError> {
    let mut wow64: BOOL = 0;
    // SAFETY: `wow64` outlives the call.
    if unsafe { IsWow64Process(process, &mut wow64) } == 0 {
        return Err(os_error("IsWow64Process"));
    }
    Ok(wow64 != 0)
}

fn query_process<T>(process: HANDLE, class: i32, info: &mut T) -> Result<(), DebugError> {
    let size = u32::try_from(std::mem::size_of::<T>()).unwrap_or(u32::MAX);
    // SAFETY: `info` is valid for `size` bytes.
    let status = unsafe {
        NtQueryInformationProcess(
            process,
            class,
            (info as *mut T).cast(),
            size,
            std::ptr::null_mut(),
        )
    };
    if status < 0 {
        return Err(DebugError::Os {
            action: "NtQueryInformationProcess",
            source: io::Error::other(format!("status {status:#x}")),
        });
    }
    Ok(())
}

/// The PEB address and layout to read it with.
fn locate_peb(pid: u32, process: HANDLE) -> Result<(u64, PebLayout), DebugError> {
    let target_wow64 = is_wow64(process)?;
    if cfg!(target_pointer_width = "64") && target_wow64 {
        let mut peb32: usize = 0;
        query_process(process, ProcessWow64Information, &mut peb32)?;
        return Ok((peb32 as u64, PebLayout::BITS32));
    }
    // SAFETY: no preconditions.
    if cfg!(target_pointer_width = "32") && is_wow64(unsafe { GetCurrentProcess() })? && !target_wow64
    {
        return Err(DebugError::UnsupportedLayout { pid });
    }

    // SAFETY: all-zero is a valid PROCESS_BASIC_INFORMATION.
    let mut info: PROCESS_BASIC_INFORMATION = unsafe { std::mem::zeroed() };
    query_process(process, ProcessBasicInformation, &mut info)?;
    let layout = if cfg!(target_pointer_width = "64") { PebLayout::BITS64 } else { PebLayout::BITS32 };
    Ok((info.PebBaseAddress as usize as u64, layout))
}

/// NT 3.10 stores the block as ANSI.
fn block_encoding() -> BlockEncoding {
    // SAFETY: no preconditions.
    let version = unsafe { GetVersion() };
    let (major, minor) = (version & 0xFF, (version >> 8) & 0xFF);
    if major == 3 && minor == 10 {
        BlockEncoding::Ansi
    } else {
        BlockEncoding::Wide
    }
}

fn widen_ansi(bytes: &[u8]) -> Vec<u16> {
    let Ok(len) = i32::try_from(bytes.len()) else {
        return Vec::new();
    };
    if len == 0 {
        return Vec::new();
    }
    // SAFETY: `bytes` is valid for `len` bytes; a null output asks for the size.
    let needed = unsafe {
        MultiByteToWideChar(CP_ACP, 0, bytes.as_ptr(), len, std::ptr::null_mut(), 0)
    };
    if needed <= 0 {
        return Vec::new();
    }
    let mut wide = vec![0u16; needed as usize];
    // SAFETY: `wide` holds `needed` units.
    let written =
        unsafe { MultiByteToWideChar(CP_ACP, 0, bytes.as_ptr(), len, wide.as_mut_ptr(), needed) };
    wide.truncate(written.max(0) as usize);
    wide
}

/// The Win32 debugging API, used from the thread that created the debuggee.
#[derive(Debug, Default)]
struct WindowsDebugger;

impl DebugApi for WindowsDebugger {
    type Handle = HANDLE;
    type Owned = OwnedHandle;

    fn wait_for_event(&mut self) -> Result<DebugEvent<HANDLE>, DebugError> {
        // SAFETY: all-zero is a valid DEBUG_EVENT.
        let mut event: DEBUG_EVENT = unsafe { std::mem::zeroed() };
        // SAFETY: `event` outlives the call.
        if unsafe { WaitForDebugEvent(&mut event, INFINITE) } == 0 {
            return Err(os_error("WaitForDebugEvent"));
        }
        Ok(convert_event(&event))
    }

    fn continue_event(&mut self, pid: u32, tid: u32, status: ContinueStatus) -> Result<(), DebugError> {
        let status = match status {
            ContinueStatus::Continue => DBG_CONTINUE,
            ContinueStatus::ExceptionNotHandled => DBG_EXCEPTION_NOT_HANDLED,
        };
        // SAFETY: no preconditions.
        if unsafe { ContinueDebugEvent(pid, tid, status) } == 0 {
            return Err(os_error("ContinueDebugEvent"));
        }
        Ok(())
    }

    fn duplicate(&mut self, handle: HANDLE) -> Result<OwnedHandle, DebugError> {
        // SAFETY: no preconditions.
        let current = unsafe { GetCurrentProcess() };
        let mut duplicate: HANDLE = 0;
        // SAFETY: `duplicate` outlives the call.
        let ok = unsafe {
            DuplicateHandle(current, handle, current, &mut duplicate, 0, FALSE, DUPLICATE_SAME_ACCESS)
        };
        if ok == 0 {
            return Err(os_error("DuplicateHandle"));
        }
        // SAFETY: DuplicateHandle returned a fresh handle we now own.
        Ok(unsafe { OwnedHandle::from_raw_handle(duplicate as *mut c_void) })
    }

    fn close_file(&mut self, handle: HANDLE) {
        // SAFETY: file handles in debug events belong to the debugger.
        unsafe { CloseHandle(handle) };
    }

    fn advance_instruction_pointer(&mut self, _thread: &OwnedHandle, _bytes: u32) -> Result<(), DebugError> {
        // Only MIPS and Alpha stop on the breakpoint instruction, and no
        // current Windows target is either.
        Err(DebugError::Os {
            action: "SetThreadContext",
            source: io::Error::from(io::ErrorKind::Unsupported),
        })
    }

    fn capture(&mut self, pid: u32, process: &OwnedHandle) -> Result<CapturedState, DebugError> {
        let handle = process.as_raw_handle() as HANDLE;
        let (peb_address, layout) = locate_peb(pid, handle)?;
        peb::capture(&ProcessMemory(handle), peb_address, layout, block_encoding(), widen_ansi)
    }

    fn detach(&mut self, pid: u32) -> Result<(), DebugError> {
        // SAFETY: no preconditions.
        if unsafe { DebugActiveProcessStop(pid) } == 0 {
            return Err(os_error("DebugActiveProcessStop"));
        }
        Ok(())
    }
}

/// Starts `request` on a pump thread that debugs it; returns once the
/// process exists or creating it failed.
pub(crate) fn launch_debugged(request: LaunchRequest) -> Result<SystemChild, LaunchError> {
    let program = request.program().to_string();
    let capture = Arc::new(AtomicBool::new(true));
    let pump_capture = Arc::clone(&capture);
    let (tx, rx) = mpsc::channel();

    let pump = thread::Builder::new()
        .name("debug-pump".to_string())
        .spawn(move || {
            let mut command = build_command(request, true);
            let spawned = command.spawn();
            drop(command);
            let child = match spawned {
                Ok(child) => child,
                Err(e) => {
                    let _ = tx.send(Err(e));
                    return Err(DebugError::Os {
                        action: "CreateProcess",
                        source: io::Error::other("launch failed"),
                    });
                }
            };
            let pid = child.id();
            // SAFETY: no preconditions.
            unsafe { DebugSetProcessKillOnExit(FALSE) };
            if tx.send(Ok(child)).is_err() {
                tracing::warn!(pid, "launcher went away before the debuggee was handed over");
            }
            DebugSession::new(WindowsDebugger, pid, pump_capture).run()
        })
        .map_err(|source| LaunchError::Spawn { program: program.clone(), source })?;

    match rx.recv() {
        Ok(Ok(child)) => Ok(SystemChild::debugged(child, pump, capture)),
        Ok(Err(source)) => {
            let _ = pump.join();
            Err(LaunchError::Spawn { program, source })
        }
        Err(_) => Err(LaunchError::Spawn {
            program,
            source: io::Error::other("debug pump exited before launching"),
        }),
    }
}
